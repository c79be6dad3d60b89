//! Bulk natural-key upserts for the three event tables.
//!
//! All writes go through `INSERT ... ON CONFLICT DO UPDATE` keyed on the
//! natural key, so re-delivering the same upstream record (retried page,
//! overlapping backfill chunk) overwrites rather than duplicates.

use sea_orm::{DatabaseConnection, EntityTrait, sea_query::OnConflict};

use crate::entity::prelude::*;
use crate::entity::{click, conversion, visit};

use super::errors::Result;

/// Build the ON CONFLICT clause for visit upserts.
///
/// Conflict target is the `click_id` natural key; every payload column is
/// overwritten (last-write-wins, no conflict detection).
pub(crate) fn visit_upsert_on_conflict() -> OnConflict {
    OnConflict::column(visit::Column::ClickId)
        .update_columns([
            visit::Column::ExternalId,
            visit::Column::CampaignId,
            visit::Column::CampaignName,
            visit::Column::TrafficSourceId,
            visit::Column::TrafficSourceName,
            visit::Column::OfferId,
            visit::Column::OfferName,
            visit::Column::AffiliateNetworkId,
            visit::Column::AffiliateNetworkName,
            visit::Column::LanderId,
            visit::Column::LanderName,
            visit::Column::VisitTimestamp,
            visit::Column::CountryCode,
            visit::Column::CountryName,
            visit::Column::Region,
            visit::Column::City,
            visit::Column::Device,
            visit::Column::DeviceName,
            visit::Column::Brand,
            visit::Column::Model,
            visit::Column::Os,
            visit::Column::OsVersion,
            visit::Column::Browser,
            visit::Column::BrowserVersion,
            visit::Column::ConnectionType,
            visit::Column::Isp,
            visit::Column::MobileCarrier,
            visit::Column::Ip,
            visit::Column::Referrer,
            visit::Column::UserAgent,
            visit::Column::CustomVar1,
            visit::Column::CustomVar2,
            visit::Column::CustomVar3,
            visit::Column::CustomVar4,
            visit::Column::CustomVar5,
            visit::Column::CustomVar6,
            visit::Column::CustomVar7,
            visit::Column::CustomVar8,
            visit::Column::CustomVar9,
            visit::Column::CustomVar10,
            visit::Column::RawData,
            visit::Column::SyncedAt,
        ])
        .to_owned()
}

/// Build the ON CONFLICT clause for click upserts.
pub(crate) fn click_upsert_on_conflict() -> OnConflict {
    OnConflict::column(click::Column::ClickId)
        .update_columns([
            click::Column::ExternalId,
            click::Column::CampaignId,
            click::Column::CampaignName,
            click::Column::OfferId,
            click::Column::OfferName,
            click::Column::LanderId,
            click::Column::LanderName,
            click::Column::ClickTimestamp,
            click::Column::CountryCode,
            click::Column::CountryName,
            click::Column::Device,
            click::Column::Os,
            click::Column::Browser,
            click::Column::Ip,
            click::Column::RawData,
            click::Column::SyncedAt,
        ])
        .to_owned()
}

/// Build the ON CONFLICT clause for conversion upserts.
///
/// Conflict target is the composite `(click_id, postback_timestamp)` key.
pub(crate) fn conversion_upsert_on_conflict() -> OnConflict {
    OnConflict::columns([
        conversion::Column::ClickId,
        conversion::Column::PostbackTimestamp,
    ])
    .update_columns([
        conversion::Column::ExternalId,
        conversion::Column::TransactionId,
        conversion::Column::CampaignId,
        conversion::Column::CampaignName,
        conversion::Column::OfferId,
        conversion::Column::OfferName,
        conversion::Column::AffiliateNetworkId,
        conversion::Column::AffiliateNetworkName,
        conversion::Column::VisitTimestamp,
        conversion::Column::CountryCode,
        conversion::Column::CountryName,
        conversion::Column::Revenue,
        conversion::Column::Payout,
        conversion::Column::Cost,
        conversion::Column::Profit,
        conversion::Column::Device,
        conversion::Column::Os,
        conversion::Column::Browser,
        conversion::Column::ConnectionType,
        conversion::Column::Isp,
        conversion::Column::Ip,
        conversion::Column::CustomVar1,
        conversion::Column::CustomVar2,
        conversion::Column::CustomVar3,
        conversion::Column::CustomVar4,
        conversion::Column::CustomVar5,
        conversion::Column::RawData,
        conversion::Column::SyncedAt,
    ])
    .to_owned()
}

/// Upsert a batch of visits keyed by `click_id`.
///
/// Returns the number of rows written. Empty batches short-circuit without a
/// database round-trip.
pub async fn upsert_visits(db: &DatabaseConnection, models: Vec<VisitActiveModel>) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }

    let count = Visit::insert_many(models)
        .on_conflict(visit_upsert_on_conflict())
        .exec_without_returning(db)
        .await?;
    Ok(count)
}

/// Upsert a batch of clicks keyed by `click_id`.
pub async fn upsert_clicks(db: &DatabaseConnection, models: Vec<ClickActiveModel>) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }

    let count = Click::insert_many(models)
        .on_conflict(click_upsert_on_conflict())
        .exec_without_returning(db)
        .await?;
    Ok(count)
}

/// Upsert a batch of conversions keyed by `(click_id, postback_timestamp)`.
pub async fn upsert_conversions(
    db: &DatabaseConnection,
    models: Vec<ConversionActiveModel>,
) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }

    let count = Conversion::insert_many(models)
        .on_conflict(conversion_upsert_on_conflict())
        .exec_without_returning(db)
        .await?;
    Ok(count)
}
