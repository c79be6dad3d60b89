//! SyncCursor entity - per-entity watermark for incremental syncs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The three tracked record types, used as the cursor key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum EntityKind {
    #[sea_orm(string_value = "visits")]
    Visits,
    #[sea_orm(string_value = "clicks")]
    Clicks,
    #[sea_orm(string_value = "conversions")]
    Conversions,
}

impl EntityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Visits => "visits",
            EntityKind::Clicks => "clicks",
            EntityKind::Conversions => "conversions",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SyncCursor model - one row per entity kind.
///
/// `last_sync_timestamp` is the watermark up to which the entity has been
/// fully synced; it never moves backward. `records_synced` is informational
/// (the last run's count), not cumulative.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sync_cursors")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Entity kind this cursor tracks (unique).
    #[sea_orm(unique)]
    pub entity_type: EntityKind,

    /// Watermark: end of the last completed sync window.
    pub last_sync_timestamp: DateTimeWithTimeZone,

    /// Records written by the last completed run.
    pub records_synced: i64,

    /// When this cursor row was last written.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
