//! Conversion entity - one row per postback, keyed by (click id, postback time).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Conversion model.
///
/// The store-level natural key is `(click_id, postback_timestamp)`; a missing
/// postback timestamp is stored as an empty string so the composite key is
/// total. Monetary columns are always written, defaulting to zero.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversions")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    // ─── Identity ────────────────────────────────────────────────────────────
    /// First half of the natural key: the originating click.
    pub click_id: String,
    /// Second half of the natural key. Empty string when the upstream omitted
    /// the postback timestamp.
    pub postback_timestamp: String,
    pub external_id: Option<String>,
    /// Provider-issued transaction identifier, when present.
    pub transaction_id: Option<String>,

    // ─── Campaign / funnel ───────────────────────────────────────────────────
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub offer_id: Option<String>,
    pub offer_name: Option<String>,
    pub affiliate_network_id: Option<String>,
    pub affiliate_network_name: Option<String>,

    // ─── Timing ──────────────────────────────────────────────────────────────
    pub visit_timestamp: Option<String>,

    // ─── Geo ─────────────────────────────────────────────────────────────────
    pub country_code: Option<String>,
    pub country_name: Option<String>,

    // ─── Money ───────────────────────────────────────────────────────────────
    pub revenue: f64,
    pub payout: f64,
    pub cost: f64,
    pub profit: f64,

    // ─── Device / connection ─────────────────────────────────────────────────
    pub device: Option<String>,
    pub os: Option<String>,
    pub browser: Option<String>,
    pub connection_type: Option<String>,
    pub isp: Option<String>,
    pub ip: Option<String>,

    // ─── Custom variables ────────────────────────────────────────────────────
    pub custom_var_1: Option<String>,
    pub custom_var_2: Option<String>,
    pub custom_var_3: Option<String>,
    pub custom_var_4: Option<String>,
    pub custom_var_5: Option<String>,

    // ─── Forward compatibility ───────────────────────────────────────────────
    /// Full raw upstream payload.
    #[sea_orm(column_type = "Json")]
    pub raw_data: serde_json::Value,

    // ─── Tracking ────────────────────────────────────────────────────────────
    /// When this row was last written by a sync.
    pub synced_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
