//! Destination store operations.
//!
//! The engine treats the store as an idempotent row-upsert service: bulk
//! natural-key upserts for the event tables, cursor reads/advances, and
//! delete-by-age retention sweeps. Row-level atomicity comes from the
//! database; no cross-row transactions are used.

pub mod cursor;
mod errors;
mod records;
pub mod retention;

pub use errors::{Result, StoreError};
pub use records::{upsert_clicks, upsert_conversions, upsert_visits};
pub use retention::{RetentionReport, purge_older_than};
