//! Sync cursor persistence.
//!
//! One cursor row per entity kind. The watermark never moves backward: the
//! upsert only applies when the incoming timestamp is at or past the stored
//! one, so re-running a historical backfill window cannot regress the cursor.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::{Alias, Expr, OnConflict},
};
use uuid::Uuid;

use crate::entity::prelude::*;
use crate::entity::sync_cursor;

use super::errors::Result;

/// Fetch the cursor row for an entity kind, if one exists.
///
/// A missing row means the entity has never completed a sync; callers fall
/// back to their configured lookback. The row is created by the first
/// [`advance`] after a completed sync, never here.
pub async fn get(db: &DatabaseConnection, kind: EntityKind) -> Result<Option<SyncCursorModel>> {
    let cursor = SyncCursor::find()
        .filter(sync_cursor::Column::EntityType.eq(kind))
        .one(db)
        .await?;
    Ok(cursor)
}

/// Build the conditional ON CONFLICT clause for cursor advancement.
///
/// The `action_and_where` guard keeps `last_sync_timestamp` monotonically
/// non-decreasing: an incoming watermark older than the stored one leaves the
/// row untouched.
pub(crate) fn advance_on_conflict() -> OnConflict {
    OnConflict::column(sync_cursor::Column::EntityType)
        .update_columns([
            sync_cursor::Column::LastSyncTimestamp,
            sync_cursor::Column::RecordsSynced,
            sync_cursor::Column::UpdatedAt,
        ])
        .action_and_where(
            Condition::all()
                .add(
                    Expr::col((SyncCursor, sync_cursor::Column::LastSyncTimestamp)).lte(Expr::col((
                        Alias::new("excluded"),
                        sync_cursor::Column::LastSyncTimestamp,
                    ))),
                )
                .into(),
        )
        .to_owned()
}

/// Advance the cursor for `kind` to `to`, recording the run's synced count.
///
/// Called only after a sync loop completes; an empty run still advances the
/// watermark so the same empty window is not rescanned forever.
pub async fn advance(
    db: &DatabaseConnection,
    kind: EntityKind,
    to: DateTime<Utc>,
    records_synced: usize,
) -> Result<()> {
    let now = Utc::now().fixed_offset();
    let model = SyncCursorActiveModel {
        id: Set(Uuid::new_v4()),
        entity_type: Set(kind),
        last_sync_timestamp: Set(to.fixed_offset()),
        records_synced: Set(records_synced as i64),
        updated_at: Set(now),
    };

    SyncCursor::insert(model)
        .on_conflict(advance_on_conflict())
        .exec_without_returning(db)
        .await?;
    Ok(())
}
