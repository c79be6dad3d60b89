//! Shared sync types and constants.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::store::{RetentionReport, StoreError};
use crate::tracker::TrackerError;

pub use crate::entity::sync_cursor::EntityKind;

/// Default page size for the windowed conversions feed.
pub const DEFAULT_PAGE_SIZE: u64 = 1000;

/// Default per-campaign fetch limit for the live feeds.
pub const DEFAULT_LIVE_LIMIT: u64 = 100;

/// Default incremental window when no cursor exists yet.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 1;

/// Default retention period for synced rows.
pub const DEFAULT_RETENTION_DAYS: u32 = 90;

/// Row limit for the campaign-discovery report.
pub const CAMPAIGN_DISCOVERY_LIMIT: u64 = 500;

/// How a sync loop reacts when one campaign's fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Log the failed campaign and continue with the rest. Campaigns are
    /// independent units of failure in campaign-scoped mode.
    #[default]
    SkipAndContinue,
    /// Propagate the first error and abort the cycle.
    AbortCycle,
}

/// How the set of campaigns to sync is discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CampaignScope {
    /// Aggregate report grouped by campaign; keeps only campaigns with
    /// recent traffic (visits > 0) whose name matches the filter.
    #[default]
    ActiveReport,
    /// Flat campaign listing filtered by name substring; no traffic check.
    Listing,
}

/// In-batch dedup key for conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionKey {
    /// Key by `(click_id, postback_timestamp)` - one row per postback.
    #[default]
    ClickIdPostback,
    /// Key by `click_id` alone - collapses repeated postbacks per click.
    ClickId,
}

/// Inclusive-exclusive time window for a windowed sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl SyncWindow {
    /// Window covering the most recent `lookback` up to now.
    #[must_use]
    pub fn last(lookback: Duration) -> Self {
        let to = Utc::now();
        Self {
            from: to - lookback,
            to,
        }
    }
}

/// Options shared by all sync loops. One instance drives a whole cycle.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Page size for the offset-paginated conversions feed.
    pub page_size: u64,
    /// Per-campaign fetch limit for the live visit/click feeds.
    pub live_limit: u64,
    /// Window when no cursor exists, and discovery report span.
    pub lookback: Duration,
    /// Campaign-name substring filter; `None` syncs every campaign.
    pub campaign_filter: Option<String>,
    /// Campaign discovery strategy.
    pub campaign_scope: CampaignScope,
    /// In-batch conversion dedup policy.
    pub conversion_key: ConversionKey,
    /// Error handling for campaign-scoped fetches.
    pub failure_mode: FailureMode,
    /// Delete rows older than this many days after a successful cycle;
    /// `None` disables retention cleanup.
    pub retention_days: Option<u32>,
    /// Pacing: pause after this many sequential campaign fetches.
    pub pace_every: u32,
    /// Pacing: length of the pause.
    pub pace_pause: StdDuration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            live_limit: DEFAULT_LIVE_LIMIT,
            lookback: Duration::days(DEFAULT_LOOKBACK_DAYS),
            campaign_filter: None,
            campaign_scope: CampaignScope::default(),
            conversion_key: ConversionKey::default(),
            failure_mode: FailureMode::default(),
            retention_days: Some(DEFAULT_RETENTION_DAYS),
            pace_every: crate::tracker::DEFAULT_PACE_EVERY,
            pace_pause: crate::tracker::DEFAULT_PACE_PAUSE,
        }
    }
}

/// Result of syncing one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOutcome {
    pub kind: EntityKind,
    /// Records upserted by this run (after filtering and dedup).
    pub synced: usize,
    /// The window this run covered; its `to` bound is the new watermark.
    pub window: SyncWindow,
}

/// Result of one full sync cycle.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CycleReport {
    pub visits: usize,
    pub clicks: usize,
    pub conversions: usize,
    pub retention: Option<RetentionReport>,
}

impl CycleReport {
    /// Total records written across all entities.
    #[must_use]
    pub fn total(&self) -> usize {
        self.visits + self.clicks + self.conversions
    }
}

/// Result of a chunked backfill run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackfillReport {
    pub conversions: usize,
    pub chunks_run: usize,
    pub chunks_failed: usize,
}

/// Errors that abort a sync loop.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Upstream fetch or authentication failure.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// Destination store rejected a write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_options_defaults_match_documented_values() {
        let options = SyncOptions::default();
        assert_eq!(options.page_size, 1000);
        assert_eq!(options.live_limit, 100);
        assert_eq!(options.lookback, Duration::days(1));
        assert_eq!(options.campaign_filter, None);
        assert_eq!(options.campaign_scope, CampaignScope::ActiveReport);
        assert_eq!(options.conversion_key, ConversionKey::ClickIdPostback);
        assert_eq!(options.failure_mode, FailureMode::SkipAndContinue);
        assert_eq!(options.retention_days, Some(90));
        assert_eq!(options.pace_every, 10);
    }

    #[test]
    fn sync_window_last_spans_the_lookback() {
        let window = SyncWindow::last(Duration::days(1));
        assert_eq!(window.to - window.from, Duration::days(1));
    }

    #[test]
    fn cycle_report_totals_all_entities() {
        let report = CycleReport {
            visits: 3,
            clicks: 2,
            conversions: 1,
            retention: None,
        };
        assert_eq!(report.total(), 6);
    }
}
