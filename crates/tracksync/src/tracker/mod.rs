//! Tracker API access: authentication, pacing, and the report client.

mod auth;
pub(crate) mod client;
mod error;
mod pacing;
mod types;

pub use auth::{Credentials, TokenManager};
pub use client::{DEFAULT_BASE_URL, TrackerClient};
pub use error::{AuthError, TrackerError, short_error_message};
pub use pacing::{DEFAULT_PACE_EVERY, DEFAULT_PACE_PAUSE, RequestPacer};
pub use types::{Campaign, RowsResponse};
