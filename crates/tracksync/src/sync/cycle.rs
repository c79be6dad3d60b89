//! The cycle orchestrator: one full visits → clicks → conversions pass.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::store;
use crate::tracker::TrackerClient;

use super::engine::{discover_campaigns, sync_clicks, sync_conversions, sync_visits};
use super::types::{CycleReport, SyncError, SyncOptions, SyncWindow};

/// Run one sync cycle: campaign discovery, then visits, clicks, and
/// conversions in sequence, then retention cleanup.
///
/// Entities run strictly sequentially; the first fatal error aborts the
/// remainder of the cycle. Entities that already completed keep their
/// advanced cursors, so the next scheduled cycle resumes from their new
/// watermarks. Retention cleanup only runs after a fully successful pass.
pub async fn run_cycle(
    client: &TrackerClient,
    db: &DatabaseConnection,
    options: &SyncOptions,
) -> Result<CycleReport, SyncError> {
    let started = std::time::Instant::now();

    let campaigns =
        discover_campaigns(client, options, SyncWindow::last(options.lookback)).await?;

    let visits = sync_visits(client, db, options, &campaigns).await?;
    let clicks = sync_clicks(client, db, options, &campaigns).await?;
    let conversions = sync_conversions(client, db, options, None).await?;

    let retention = match options.retention_days {
        Some(days) => {
            let report = store::purge_older_than(db, days).await?;
            if report.total() > 0 {
                tracing::info!(
                    visits = report.visits_deleted,
                    clicks = report.clicks_deleted,
                    conversions = report.conversions_deleted,
                    "retention cleanup removed expired rows"
                );
            }
            Some(report)
        }
        None => None,
    };

    let report = CycleReport {
        visits: visits.synced,
        clicks: clicks.synced,
        conversions: conversions.synced,
        retention,
    };

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis(),
        visits = report.visits,
        clicks = report.clicks,
        conversions = report.conversions,
        finished_at = %Utc::now(),
        "sync cycle complete"
    );

    Ok(report)
}
