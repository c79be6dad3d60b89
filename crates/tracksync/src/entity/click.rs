//! Click entity - one row per tracked click, keyed by click id.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Click model - narrower than a visit; the upstream click feed carries a
/// reduced field set.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clicks")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Natural key: the tracker-issued click identifier.
    #[sea_orm(unique)]
    pub click_id: String,
    pub external_id: Option<String>,

    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub offer_id: Option<String>,
    pub offer_name: Option<String>,
    pub lander_id: Option<String>,
    pub lander_name: Option<String>,

    /// Upstream click timestamp (text; unparsable values pass through).
    pub click_timestamp: Option<String>,

    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub device: Option<String>,
    pub os: Option<String>,
    pub browser: Option<String>,
    pub ip: Option<String>,

    /// Full raw upstream payload.
    #[sea_orm(column_type = "Json")]
    pub raw_data: serde_json::Value,

    /// When this row was last written by a sync.
    pub synced_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
