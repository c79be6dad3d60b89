//! Retention cleanup: bulk delete-by-age across the event tables.

use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entity::prelude::*;
use crate::entity::{click, conversion, visit};

use super::errors::Result;

/// Rows removed by one retention sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RetentionReport {
    pub visits_deleted: u64,
    pub clicks_deleted: u64,
    pub conversions_deleted: u64,
}

impl RetentionReport {
    /// Total rows removed across all tables.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.visits_deleted + self.clicks_deleted + self.conversions_deleted
    }
}

/// Delete rows synced more than `retention_days` ago from all three tables.
///
/// The cutoff is applied to `synced_at` (when the engine wrote the row), not
/// the upstream event timestamp, which may be unparsable text.
pub async fn purge_older_than(
    db: &DatabaseConnection,
    retention_days: u32,
) -> Result<RetentionReport> {
    let cutoff = (Utc::now() - Duration::days(i64::from(retention_days))).fixed_offset();

    let visits = Visit::delete_many()
        .filter(visit::Column::SyncedAt.lt(cutoff))
        .exec(db)
        .await?;
    let clicks = Click::delete_many()
        .filter(click::Column::SyncedAt.lt(cutoff))
        .exec(db)
        .await?;
    let conversions = Conversion::delete_many()
        .filter(conversion::Column::SyncedAt.lt(cutoff))
        .exec(db)
        .await?;

    Ok(RetentionReport {
        visits_deleted: visits.rows_affected,
        clicks_deleted: clicks.rows_affected,
        conversions_deleted: conversions.rows_affected,
    })
}
