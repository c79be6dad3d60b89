use thiserror::Error;

/// Errors from the credential exchange.
///
/// Authentication failures are fatal for the current sync cycle; the engine
/// never retries them itself.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Access id/key pair missing or empty.
    #[error("tracker credentials are not configured")]
    MissingCredentials,

    /// The exchange endpoint returned a non-success status.
    #[error("credential exchange failed with status {status}: {message}")]
    Exchange { status: u16, message: String },

    /// Transport failure talking to the exchange endpoint.
    #[error("credential exchange transport error: {0}")]
    Http(String),

    /// The exchange succeeded but returned no usable token.
    #[error("credential exchange returned a malformed session payload")]
    MalformedSession,
}

/// Errors when interacting with the tracker API.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Authentication failure (fatal for the cycle).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Non-2xx response from the tracker API.
    #[error("upstream API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Network or transport error.
    #[error("network error: {0}")]
    Network(String),

    /// Response body failed to decode.
    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request URL could not be constructed.
    #[error("invalid request url: {0}")]
    Url(String),
}

impl TrackerError {
    /// Create an API error from a status code and response body.
    #[inline]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Check whether this error originated in authentication.
    #[inline]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// Extract a short error message suitable for log lines.
///
/// Takes the first line of the error message, which keeps campaign-skip
/// warnings readable when the upstream body is multi-line HTML.
#[inline]
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
