//! Tracker API client.
//!
//! Issues authenticated, paginated GET requests against the tracker's report
//! endpoints (Voluum-compatible session-token API). All I/O goes through the
//! [`HttpTransport`] seam so the client is fully testable against an
//! in-memory transport.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use url::Url;

use crate::http::{HttpRequest, HttpTransport, reqwest_transport::ReqwestTransport};

use super::auth::{Credentials, TokenManager};
use super::error::{Result, TrackerError};
use super::types::{Campaign, RowsResponse};

/// Default tracker API host.
pub const DEFAULT_BASE_URL: &str = "https://api.voluum.com";

/// Session token header expected by the tracker.
const TOKEN_HEADER: &str = "cwauth-token";

/// Transport timeout for report requests; large conversion pages are slow.
const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(60);

/// Report timezone sent with every windowed request.
const REPORT_TIMEZONE: &str = "UTC";

/// Authenticated client for the tracker's read API.
#[derive(Clone)]
pub struct TrackerClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    auth: Arc<TokenManager>,
}

impl TrackerClient {
    /// Create a client backed by a real HTTP transport.
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(REQUEST_TIMEOUT)
            .map_err(|e| TrackerError::Network(e.to_string()))?;
        Ok(Self::new_with_transport(
            base_url,
            credentials,
            Arc::new(transport),
        ))
    }

    /// Create a client with an injected transport (used by tests).
    pub fn new_with_transport(
        base_url: &str,
        credentials: Credentials,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let auth = TokenManager::new(Arc::clone(&transport), base_url.clone(), credentials);
        Self {
            transport,
            base_url,
            auth: Arc::new(auth),
        }
    }

    /// Get the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full request URL for `path` with query parameters.
    pub(crate) fn url_for(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        build_url(&self.base_url, path, params)
    }

    /// Issue an authenticated GET and decode the standard row-list payload.
    async fn get_rows(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<serde_json::Value>> {
        let token = self.auth.token().await?;
        let url = self.url_for(path, params)?;

        let request = HttpRequest::get(
            url,
            vec![
                ("Accept".to_string(), "application/json".to_string()),
                (TOKEN_HEADER.to_string(), token),
            ],
        );

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| TrackerError::Network(e.to_string()))?;

        if !response.is_success() {
            return Err(TrackerError::Api {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        let parsed: RowsResponse = serde_json::from_slice(&response.body)?;
        Ok(parsed.rows)
    }

    /// Fetch the aggregate report grouped by campaign for a time window.
    ///
    /// Used for campaign discovery: each row carries `campaignId`,
    /// `campaignName` and traffic counters.
    pub async fn campaign_report(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<serde_json::Value>> {
        self.get_rows(
            "/report",
            &[
                ("from", format_report_time(from)),
                ("to", format_report_time(to)),
                ("tz", REPORT_TIMEZONE.to_string()),
                ("groupBy", "campaign".to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    /// Fetch one page of the conversions feed for a time window.
    pub async fn conversions_page(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<serde_json::Value>> {
        self.get_rows(
            "/report/conversions",
            &[
                ("from", format_report_time(from)),
                ("to", format_report_time(to)),
                ("tz", REPORT_TIMEZONE.to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        )
        .await
    }

    /// Fetch the live visit buffer for one campaign.
    pub async fn live_visits(
        &self,
        campaign_id: &str,
        limit: u64,
    ) -> Result<Vec<serde_json::Value>> {
        self.get_rows(
            &format!("/report/live/visits/{campaign_id}"),
            &[("limit", limit.to_string())],
        )
        .await
    }

    /// Fetch the live click buffer for one campaign.
    pub async fn live_clicks(
        &self,
        campaign_id: &str,
        limit: u64,
    ) -> Result<Vec<serde_json::Value>> {
        self.get_rows(
            &format!("/report/live/clicks/{campaign_id}"),
            &[("limit", limit.to_string())],
        )
        .await
    }

    /// Fetch one page of the flat campaign listing.
    ///
    /// Alternate discovery strategy: no traffic counters, just identity.
    pub async fn list_campaigns(&self, limit: u64, offset: u64) -> Result<Vec<Campaign>> {
        let rows = self
            .get_rows(
                "/campaign",
                &[
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| {
                let id = row.get("id").and_then(|v| v.as_str())?;
                let name = row
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                Some(Campaign {
                    id: id.to_string(),
                    name: name.to_string(),
                    visits: 0,
                })
            })
            .collect())
    }
}

/// Format a window bound the way the report API expects.
///
/// Bounds must be hour-aligned; minutes and seconds are truncated.
pub(crate) fn format_report_time(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:00:00").to_string()
}

/// Build a request URL from base, path and query parameters.
pub(crate) fn build_url(base: &str, path: &str, params: &[(&str, String)]) -> Result<String> {
    let mut url = Url::parse(&format!("{base}{path}"))
        .map_err(|e| TrackerError::Url(format!("{base}{path}: {e}")))?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    Ok(url.to_string())
}
