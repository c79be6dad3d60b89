//! Session token management for the tracker API.
//!
//! The tracker issues short-lived session tokens from a credential-exchange
//! endpoint. [`TokenManager`] owns a single cached session and refreshes it
//! before the provider-side expiry: the local copy is considered stale a
//! safety margin earlier than the stated lifetime, so a token is never used
//! right at the edge of its validity window.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::http::{HttpRequest, HttpTransport};

use super::error::AuthError;
use super::types::SessionResponse;

/// Provider-stated session lifetime.
const TOKEN_LIFETIME_SECS: i64 = 4 * 60 * 60;

/// Local sessions expire this much earlier than the provider's lifetime.
const EXPIRY_SAFETY_MARGIN_SECS: i64 = 30 * 60;

/// Access id/key pair for the credential exchange.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_id: String,
    pub access_key: String,
}

impl Credentials {
    #[must_use]
    pub fn new(access_id: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            access_id: access_id.into(),
            access_key: access_key.into(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.access_id.is_empty() && !self.access_key.is_empty()
    }
}

/// A cached session token. Replaced wholesale on refresh, never mutated.
#[derive(Debug, Clone)]
struct AuthSession {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Owns the cached session and performs credential exchanges.
///
/// The session is instance state, not a global: separate managers (e.g. in
/// tests, or two engines against different accounts) never share tokens.
pub struct TokenManager {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    credentials: Credentials,
    session: Mutex<Option<AuthSession>>,
}

impl TokenManager {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
            credentials,
            session: Mutex::new(None),
        }
    }

    /// Return a valid session token, exchanging credentials only when the
    /// cached session is missing or stale.
    ///
    /// # Errors
    /// `AuthError::MissingCredentials` when no credentials are configured;
    /// `AuthError::Exchange` when the endpoint rejects them. Both are fatal
    /// for the current cycle.
    pub async fn token(&self) -> Result<String, AuthError> {
        if !self.credentials.is_configured() {
            return Err(AuthError::MissingCredentials);
        }

        let mut session = self.session.lock().await;
        if let Some(cached) = session.as_ref()
            && Utc::now() < cached.expires_at
        {
            return Ok(cached.token.clone());
        }

        let fresh = self.exchange().await?;
        let token = fresh.token.clone();
        *session = Some(fresh);
        Ok(token)
    }

    async fn exchange(&self) -> Result<AuthSession, AuthError> {
        let url = format!("{}/auth/access/session", self.base_url);
        let body = serde_json::json!({
            "accessId": self.credentials.access_id,
            "accessKey": self.credentials.access_key,
        });
        let request = HttpRequest::post_json(
            url,
            vec![("Accept".to_string(), "application/json".to_string())],
            &body,
        );

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        if !response.is_success() {
            return Err(AuthError::Exchange {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        let parsed: SessionResponse =
            serde_json::from_slice(&response.body).map_err(|_| AuthError::MalformedSession)?;
        let token = parsed.token.ok_or(AuthError::MalformedSession)?;

        tracing::debug!("acquired new tracker session token");

        Ok(AuthSession {
            token,
            expires_at: Utc::now()
                + Duration::seconds(TOKEN_LIFETIME_SECS - EXPIRY_SAFETY_MARGIN_SECS),
        })
    }
}
