//! Chunked historical backfill.
//!
//! Re-runs the windowed conversions sync over a bounded historical range,
//! split into date chunks so no single request covers an unbounded span.
//! Chunks run most-recent-first; a chunk's failure is logged and counted,
//! and the chunker proceeds - partial backfill is resumable by re-running
//! the same range, since upserts are idempotent. The live visit/click feeds
//! expose no historical window upstream, so there is nothing to chunk for
//! them.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;

use crate::tracker::TrackerClient;

use super::engine::sync_conversions;
use super::types::{BackfillReport, SyncOptions, SyncWindow};

/// Default chunk width in days.
pub const DEFAULT_BACKFILL_CHUNK_DAYS: u32 = 7;

/// Fixed delay between chunks to bound request rate.
const CHUNK_DELAY: StdDuration = StdDuration::from_secs(2);

/// Partition `[now - total_days, now]` into consecutive windows of at most
/// `chunk_days`, most recent first.
#[must_use]
pub fn chunk_windows(now: DateTime<Utc>, total_days: u32, chunk_days: u32) -> Vec<SyncWindow> {
    let mut windows = Vec::new();
    let chunk = chunk_days.max(1);

    let mut start_day = 0u32;
    while start_day < total_days {
        let end_day = (start_day + chunk).min(total_days);
        windows.push(SyncWindow {
            from: now - Duration::days(i64::from(end_day)),
            to: now - Duration::days(i64::from(start_day)),
        });
        start_day = end_day;
    }

    windows
}

/// Backfill the conversions feed over the last `total_days`.
///
/// Each chunk invokes the windowed sync loop with an explicit window,
/// bypassing the cursor; the monotonic advance guard keeps historical chunks
/// from moving the watermark backward.
pub async fn backfill(
    client: &TrackerClient,
    db: &DatabaseConnection,
    options: &SyncOptions,
    total_days: u32,
    chunk_days: u32,
) -> BackfillReport {
    let windows = chunk_windows(Utc::now(), total_days, chunk_days);
    let chunk_count = windows.len();
    tracing::info!(total_days, chunk_days, chunks = chunk_count, "starting backfill");

    let mut report = BackfillReport::default();

    for (i, window) in windows.into_iter().enumerate() {
        tracing::info!(
            chunk = i + 1,
            chunks = chunk_count,
            from = %window.from,
            to = %window.to,
            "backfilling chunk"
        );

        match sync_conversions(client, db, options, Some(window)).await {
            Ok(outcome) => {
                report.conversions += outcome.synced;
                report.chunks_run += 1;
            }
            Err(e) => {
                tracing::warn!(chunk = i + 1, error = %e, "backfill chunk failed, continuing");
                report.chunks_failed += 1;
            }
        }

        if i + 1 < chunk_count {
            tokio::time::sleep(CHUNK_DELAY).await;
        }
    }

    tracing::info!(
        conversions = report.conversions,
        failed = report.chunks_failed,
        "backfill complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_partition_the_range_most_recent_first() {
        let now = Utc::now();
        let windows = chunk_windows(now, 30, 7);

        assert_eq!(windows.len(), 5);
        assert_eq!(windows[0].to, now);
        assert_eq!(windows[0].from, now - Duration::days(7));
        // Final chunk is the 2-day remainder at the oldest edge.
        assert_eq!(windows[4].to, now - Duration::days(28));
        assert_eq!(windows[4].from, now - Duration::days(30));
    }

    #[test]
    fn chunks_are_contiguous() {
        let now = Utc::now();
        let windows = chunk_windows(now, 30, 7);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].from, pair[1].to);
        }
    }

    #[test]
    fn oversized_chunk_width_yields_a_single_window() {
        let now = Utc::now();
        let windows = chunk_windows(now, 3, 7);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].from, now - Duration::days(3));
        assert_eq!(windows[0].to, now);
    }

    #[test]
    fn zero_days_yields_no_windows() {
        assert!(chunk_windows(Utc::now(), 0, 7).is_empty());
    }

    #[test]
    fn zero_chunk_width_is_clamped_to_one_day() {
        let windows = chunk_windows(Utc::now(), 3, 0);
        assert_eq!(windows.len(), 3);
    }
}
