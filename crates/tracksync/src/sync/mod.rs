//! The synchronization engine.
//!
//! # Module structure
//!
//! - [`types`] - options, windows, outcome/report types, [`SyncError`]
//! - [`dedupe`] - in-batch natural-key deduplication
//! - [`engine`] - the sync loops: windowed offset pagination and
//!   campaign-scoped sweeps, plus campaign discovery
//! - [`backfill`] - chunked historical re-sync
//! - [`cycle`] - the visits → clicks → conversions orchestrator
//!
//! # Example
//!
//! ```ignore
//! use tracksync::sync::{SyncOptions, run_cycle};
//! use tracksync::tracker::{Credentials, TrackerClient, DEFAULT_BASE_URL};
//!
//! let client = TrackerClient::new(DEFAULT_BASE_URL, Credentials::new(id, key))?;
//! let db = tracksync::connect_and_migrate("sqlite://tracksync.db?mode=rwc").await?;
//! let report = run_cycle(&client, &db, &SyncOptions::default()).await?;
//! println!("synced {} records", report.total());
//! ```

mod backfill;
mod cycle;
mod dedupe;
mod engine;
mod types;

pub use backfill::{DEFAULT_BACKFILL_CHUNK_DAYS, backfill, chunk_windows};
pub use cycle::run_cycle;
pub use dedupe::dedupe_by_key;
pub use engine::{discover_campaigns, sync_clicks, sync_conversions, sync_visits};
pub use types::{
    BackfillReport, CAMPAIGN_DISCOVERY_LIMIT, CampaignScope, ConversionKey, CycleReport,
    DEFAULT_LIVE_LIMIT, DEFAULT_LOOKBACK_DAYS, DEFAULT_PAGE_SIZE, DEFAULT_RETENTION_DAYS,
    EntityKind, EntityOutcome, FailureMode, SyncError, SyncOptions, SyncWindow,
};
