//! Helpers shared by the run and backfill commands.

use chrono::Duration;

use tracksync::sync::{FailureMode, SyncOptions};
use tracksync::tracker::TrackerClient;

use crate::RunOptions;
use crate::config::Config;

/// Build a tracker client from configuration.
///
/// Fails fast when credentials are missing so the worker exits with a clear
/// message instead of failing on the first cycle's credential exchange.
pub(crate) fn build_client(config: &Config) -> Result<TrackerClient, Box<dyn std::error::Error>> {
    let credentials = config.tracker_credentials();
    if credentials.access_id.is_empty() || credentials.access_key.is_empty() {
        return Err(
            "Missing tracker credentials: set TRACKSYNC_ACCESS_ID and TRACKSYNC_ACCESS_KEY \
             (or [tracker] access_id / access_key in the config file)"
                .into(),
        );
    }

    let client = TrackerClient::new(&config.tracker_base_url(), credentials)?;
    Ok(client)
}

/// Assemble engine options from config, applying CLI overrides.
pub(crate) fn build_sync_options(config: &Config, overrides: Option<&RunOptions>) -> SyncOptions {
    let mut options = SyncOptions {
        page_size: config.sync.page_size,
        live_limit: config.sync.live_limit,
        lookback: Duration::days(config.sync.days_back),
        campaign_filter: config.sync.campaign_filter.clone(),
        campaign_scope: config.campaign_scope(),
        conversion_key: config.conversion_key(),
        failure_mode: config.failure_mode(),
        retention_days: config.retention_days(),
        ..SyncOptions::default()
    };

    if let Some(run) = overrides {
        if let Some(days) = run.days_back {
            options.lookback = Duration::days(days);
        }
        if run.campaign_filter.is_some() {
            options.campaign_filter = run.campaign_filter.clone();
        }
        if run.abort_on_campaign_error {
            options.failure_mode = FailureMode::AbortCycle;
        }
    }

    options
}
