//! Wire types for the tracker API.

use serde::Deserialize;

/// Row-list payload returned by the report endpoints.
///
/// Raw rows stay as `serde_json::Value`: the upstream schema varies per
/// report and the transformer is responsible for shaping them. A missing
/// `rows` key decodes as an empty page. The campaign listing endpoint uses
/// `campaigns` for the same shape, hence the alias.
#[derive(Debug, Default, Deserialize)]
pub struct RowsResponse {
    #[serde(default, alias = "campaigns", alias = "conversions")]
    pub rows: Vec<serde_json::Value>,
}

/// Payload of a successful credential exchange.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionResponse {
    pub(crate) token: Option<String>,
}

/// A campaign selected for campaign-scoped syncing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    /// Visit count from the discovery report; zero when discovered via the
    /// flat listing, which carries no traffic stats.
    pub visits: i64,
}
