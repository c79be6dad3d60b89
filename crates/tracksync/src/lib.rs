//! Tracksync - an incremental, idempotent mirror of ad-tracking events.
//!
//! Tracksync pulls visits, clicks, and conversions from a remote tracker's
//! report API into a local relational store so downstream reporting can run
//! offline. Syncs are cursor-tracked and incremental; every write is a
//! natural-key upsert, so retried pages, overlapping windows, and re-run
//! backfills are safe no-ops.
//!
//! # Features
//!
//! - `migrate` (default) - embedded schema migrations and
//!   [`connect_and_migrate`].
//!
//! # Example
//!
//! ```ignore
//! use tracksync::sync::{SyncOptions, run_cycle};
//! use tracksync::tracker::{Credentials, TrackerClient, DEFAULT_BASE_URL};
//!
//! let db = tracksync::connect_and_migrate("sqlite://tracksync.db?mode=rwc").await?;
//! let client = TrackerClient::new(DEFAULT_BASE_URL, Credentials::new(id, key))?;
//!
//! let report = run_cycle(&client, &db, &SyncOptions::default()).await?;
//! println!("visits={} clicks={} conversions={}",
//!     report.visits, report.clicks, report.conversions);
//! ```

pub mod db;
pub mod entity;
pub mod http;
pub mod store;
pub mod sync;
pub mod tracker;
pub mod transform;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use store::{RetentionReport, StoreError};
pub use sync::{CycleReport, SyncError, SyncOptions};
pub use tracker::{AuthError, Credentials, TrackerClient, TrackerError};
