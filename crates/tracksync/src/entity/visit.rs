//! Visit entity - one row per tracked visit, keyed by click id.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Visit model - the normalized destination shape for a tracker visit event.
///
/// Every column is written on each sync; fields the upstream omitted are
/// `None` so rows are never partially shaped.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "visits")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    // ─── Identity ────────────────────────────────────────────────────────────
    /// Natural key: the tracker-issued click identifier.
    #[sea_orm(unique)]
    pub click_id: String,
    /// Identifier assigned by the traffic source, when present.
    pub external_id: Option<String>,

    // ─── Campaign / funnel ───────────────────────────────────────────────────
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub traffic_source_id: Option<String>,
    pub traffic_source_name: Option<String>,
    pub offer_id: Option<String>,
    pub offer_name: Option<String>,
    pub affiliate_network_id: Option<String>,
    pub affiliate_network_name: Option<String>,
    pub lander_id: Option<String>,
    pub lander_name: Option<String>,

    // ─── Timing ──────────────────────────────────────────────────────────────
    /// Upstream visit timestamp. Stored as text because unparsable upstream
    /// values are passed through unchanged rather than dropped.
    pub visit_timestamp: Option<String>,

    // ─── Geo ─────────────────────────────────────────────────────────────────
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,

    // ─── Device ──────────────────────────────────────────────────────────────
    pub device: Option<String>,
    pub device_name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub os: Option<String>,
    pub os_version: Option<String>,
    pub browser: Option<String>,
    pub browser_version: Option<String>,

    // ─── Connection ──────────────────────────────────────────────────────────
    pub connection_type: Option<String>,
    pub isp: Option<String>,
    pub mobile_carrier: Option<String>,
    pub ip: Option<String>,

    // ─── Request context ─────────────────────────────────────────────────────
    #[sea_orm(column_type = "Text", nullable)]
    pub referrer: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,

    // ─── Custom variables ────────────────────────────────────────────────────
    pub custom_var_1: Option<String>,
    pub custom_var_2: Option<String>,
    pub custom_var_3: Option<String>,
    pub custom_var_4: Option<String>,
    pub custom_var_5: Option<String>,
    pub custom_var_6: Option<String>,
    pub custom_var_7: Option<String>,
    pub custom_var_8: Option<String>,
    pub custom_var_9: Option<String>,
    pub custom_var_10: Option<String>,

    // ─── Forward compatibility ───────────────────────────────────────────────
    /// Full raw upstream payload for fields the fixed schema doesn't cover.
    #[sea_orm(column_type = "Json")]
    pub raw_data: serde_json::Value,

    // ─── Tracking ────────────────────────────────────────────────────────────
    /// When this row was last written by a sync.
    pub synced_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
