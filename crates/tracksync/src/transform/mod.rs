//! Raw-row normalization into the destination schema.
//!
//! Normalization is a pure mapping: tolerant of missing keys, never failing.
//! Every normalized record has the full field set for its kind with `None`
//! (or `0.0` for money) standing in for absent upstream data, and keeps the
//! complete raw payload for forward compatibility.

mod fields;
mod time;

pub use time::normalize_timestamp;

use chrono::{DateTime, FixedOffset};
use sea_orm::Set;
use serde_json::Value;
use uuid::Uuid;

use crate::entity::prelude::*;

pub(crate) use fields::integer;
use fields::{money, text, timestamp};

/// Normalized shape of one visit event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedVisit {
    pub click_id: Option<String>,
    pub external_id: Option<String>,
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
    pub visit_timestamp: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub device: Option<String>,
    pub device_name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub os: Option<String>,
    pub os_version: Option<String>,
    pub browser: Option<String>,
    pub browser_version: Option<String>,
    pub connection_type: Option<String>,
    pub isp: Option<String>,
    pub mobile_carrier: Option<String>,
    pub ip: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub custom_vars: [Option<String>; 10],
    pub raw: Value,
}

/// Normalized shape of one click event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedClick {
    pub click_id: Option<String>,
    pub external_id: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub offer_id: Option<String>,
    pub offer_name: Option<String>,
    pub lander_id: Option<String>,
    pub lander_name: Option<String>,
    pub click_timestamp: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub device: Option<String>,
    pub os: Option<String>,
    pub browser: Option<String>,
    pub ip: Option<String>,
    pub raw: Value,
}

/// Normalized shape of one conversion postback.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedConversion {
    pub click_id: Option<String>,
    /// Empty string when the upstream omitted the postback timestamp, so the
    /// store-level composite key is total.
    pub postback_timestamp: String,
    pub external_id: Option<String>,
    pub transaction_id: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub offer_id: Option<String>,
    pub offer_name: Option<String>,
    pub affiliate_network_id: Option<String>,
    pub affiliate_network_name: Option<String>,
    pub visit_timestamp: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub revenue: f64,
    pub payout: f64,
    pub cost: f64,
    pub profit: f64,
    pub device: Option<String>,
    pub os: Option<String>,
    pub browser: Option<String>,
    pub connection_type: Option<String>,
    pub isp: Option<String>,
    pub ip: Option<String>,
    pub custom_vars: [Option<String>; 5],
    pub raw: Value,
}

/// Extract the numbered custom variables.
///
/// Older report versions abbreviate `customVariable3` as `v3`, hence the
/// two-candidate fan-out per slot.
fn custom_vars<const N: usize>(raw: &Value) -> [Option<String>; N] {
    std::array::from_fn(|i| {
        let n = i + 1;
        let long = format!("customVariable{n}");
        let short = format!("v{n}");
        text(raw, &[long.as_str(), short.as_str()])
    })
}

/// Normalize one raw visit row.
#[must_use]
pub fn normalize_visit(raw: &Value) -> NormalizedVisit {
    NormalizedVisit {
        click_id: text(raw, &["clickId"]),
        external_id: text(raw, &["externalId"]),
        campaign_id: text(raw, &["campaignId"]),
        campaign_name: text(raw, &["campaignName"]),
        traffic_source_id: text(raw, &["trafficSourceId"]),
        traffic_source_name: text(raw, &["trafficSourceName"]),
        offer_id: text(raw, &["offerId"]),
        offer_name: text(raw, &["offerName"]),
        affiliate_network_id: text(raw, &["affiliateNetworkId"]),
        affiliate_network_name: text(raw, &["affiliateNetworkName"]),
        lander_id: text(raw, &["landerId"]),
        lander_name: text(raw, &["landerName"]),
        visit_timestamp: timestamp(raw, &["timestamp", "visitTimestamp"]),
        country_code: text(raw, &["countryCode", "country"]),
        country_name: text(raw, &["countryName"]),
        region: text(raw, &["region"]),
        city: text(raw, &["city"]),
        device: text(raw, &["device", "deviceType"]),
        device_name: text(raw, &["deviceName"]),
        brand: text(raw, &["brand"]),
        model: text(raw, &["model"]),
        os: text(raw, &["os"]),
        os_version: text(raw, &["osVersion"]),
        browser: text(raw, &["browser"]),
        browser_version: text(raw, &["browserVersion"]),
        connection_type: text(raw, &["connectionType"]),
        isp: text(raw, &["isp"]),
        mobile_carrier: text(raw, &["mobileCarrier"]),
        ip: text(raw, &["ip"]),
        referrer: text(raw, &["referrer"]),
        user_agent: text(raw, &["userAgent"]),
        custom_vars: custom_vars(raw),
        raw: raw.clone(),
    }
}

/// Normalize one raw click row.
#[must_use]
pub fn normalize_click(raw: &Value) -> NormalizedClick {
    NormalizedClick {
        click_id: text(raw, &["clickId"]),
        external_id: text(raw, &["externalId"]),
        campaign_id: text(raw, &["campaignId"]),
        campaign_name: text(raw, &["campaignName"]),
        offer_id: text(raw, &["offerId"]),
        offer_name: text(raw, &["offerName"]),
        lander_id: text(raw, &["landerId"]),
        lander_name: text(raw, &["landerName"]),
        click_timestamp: timestamp(raw, &["timestamp", "clickTimestamp"]),
        country_code: text(raw, &["countryCode", "country"]),
        country_name: text(raw, &["countryName"]),
        device: text(raw, &["device", "deviceType"]),
        os: text(raw, &["os"]),
        browser: text(raw, &["browser"]),
        ip: text(raw, &["ip"]),
        raw: raw.clone(),
    }
}

/// Normalize one raw conversion row.
#[must_use]
pub fn normalize_conversion(raw: &Value) -> NormalizedConversion {
    NormalizedConversion {
        click_id: text(raw, &["clickId"]),
        postback_timestamp: timestamp(raw, &["postbackTimestamp"]).unwrap_or_default(),
        external_id: text(raw, &["externalId"]),
        transaction_id: text(raw, &["transactionId", "txid"]),
        campaign_id: text(raw, &["campaignId"]),
        campaign_name: text(raw, &["campaignName"]),
        offer_id: text(raw, &["offerId"]),
        offer_name: text(raw, &["offerName"]),
        affiliate_network_id: text(raw, &["affiliateNetworkId"]),
        affiliate_network_name: text(raw, &["affiliateNetworkName"]),
        visit_timestamp: timestamp(raw, &["visitTimestamp"]),
        country_code: text(raw, &["countryCode", "country"]),
        country_name: text(raw, &["countryName"]),
        revenue: money(raw, &["revenue"]),
        payout: money(raw, &["payout"]),
        cost: money(raw, &["cost"]),
        profit: money(raw, &["profit"]),
        device: text(raw, &["device", "deviceType"]),
        os: text(raw, &["os"]),
        browser: text(raw, &["browser"]),
        connection_type: text(raw, &["connectionType"]),
        isp: text(raw, &["isp"]),
        ip: text(raw, &["ip"]),
        custom_vars: custom_vars(raw),
        raw: raw.clone(),
    }
}

impl NormalizedVisit {
    /// Convert into a database active model stamped with the sync time.
    #[must_use]
    pub fn into_active_model(self, synced_at: DateTime<FixedOffset>) -> VisitActiveModel {
        let [v1, v2, v3, v4, v5, v6, v7, v8, v9, v10] = self.custom_vars;
        VisitActiveModel {
            id: Set(Uuid::new_v4()),
            click_id: Set(self.click_id.unwrap_or_default()),
            external_id: Set(self.external_id),
            campaign_id: Set(self.campaign_id),
            campaign_name: Set(self.campaign_name),
            traffic_source_id: Set(self.traffic_source_id),
            traffic_source_name: Set(self.traffic_source_name),
            offer_id: Set(self.offer_id),
            offer_name: Set(self.offer_name),
            affiliate_network_id: Set(self.affiliate_network_id),
            affiliate_network_name: Set(self.affiliate_network_name),
            lander_id: Set(self.lander_id),
            lander_name: Set(self.lander_name),
            visit_timestamp: Set(self.visit_timestamp),
            country_code: Set(self.country_code),
            country_name: Set(self.country_name),
            region: Set(self.region),
            city: Set(self.city),
            device: Set(self.device),
            device_name: Set(self.device_name),
            brand: Set(self.brand),
            model: Set(self.model),
            os: Set(self.os),
            os_version: Set(self.os_version),
            browser: Set(self.browser),
            browser_version: Set(self.browser_version),
            connection_type: Set(self.connection_type),
            isp: Set(self.isp),
            mobile_carrier: Set(self.mobile_carrier),
            ip: Set(self.ip),
            referrer: Set(self.referrer),
            user_agent: Set(self.user_agent),
            custom_var_1: Set(v1),
            custom_var_2: Set(v2),
            custom_var_3: Set(v3),
            custom_var_4: Set(v4),
            custom_var_5: Set(v5),
            custom_var_6: Set(v6),
            custom_var_7: Set(v7),
            custom_var_8: Set(v8),
            custom_var_9: Set(v9),
            custom_var_10: Set(v10),
            raw_data: Set(self.raw),
            synced_at: Set(synced_at),
        }
    }
}

impl NormalizedClick {
    /// Convert into a database active model stamped with the sync time.
    #[must_use]
    pub fn into_active_model(self, synced_at: DateTime<FixedOffset>) -> ClickActiveModel {
        ClickActiveModel {
            id: Set(Uuid::new_v4()),
            click_id: Set(self.click_id.unwrap_or_default()),
            external_id: Set(self.external_id),
            campaign_id: Set(self.campaign_id),
            campaign_name: Set(self.campaign_name),
            offer_id: Set(self.offer_id),
            offer_name: Set(self.offer_name),
            lander_id: Set(self.lander_id),
            lander_name: Set(self.lander_name),
            click_timestamp: Set(self.click_timestamp),
            country_code: Set(self.country_code),
            country_name: Set(self.country_name),
            device: Set(self.device),
            os: Set(self.os),
            browser: Set(self.browser),
            ip: Set(self.ip),
            raw_data: Set(self.raw),
            synced_at: Set(synced_at),
        }
    }
}

impl NormalizedConversion {
    /// Convert into a database active model stamped with the sync time.
    #[must_use]
    pub fn into_active_model(self, synced_at: DateTime<FixedOffset>) -> ConversionActiveModel {
        let [v1, v2, v3, v4, v5] = self.custom_vars;
        ConversionActiveModel {
            id: Set(Uuid::new_v4()),
            click_id: Set(self.click_id.unwrap_or_default()),
            postback_timestamp: Set(self.postback_timestamp),
            external_id: Set(self.external_id),
            transaction_id: Set(self.transaction_id),
            campaign_id: Set(self.campaign_id),
            campaign_name: Set(self.campaign_name),
            offer_id: Set(self.offer_id),
            offer_name: Set(self.offer_name),
            affiliate_network_id: Set(self.affiliate_network_id),
            affiliate_network_name: Set(self.affiliate_network_name),
            visit_timestamp: Set(self.visit_timestamp),
            country_code: Set(self.country_code),
            country_name: Set(self.country_name),
            revenue: Set(self.revenue),
            payout: Set(self.payout),
            cost: Set(self.cost),
            profit: Set(self.profit),
            device: Set(self.device),
            os: Set(self.os),
            browser: Set(self.browser),
            connection_type: Set(self.connection_type),
            isp: Set(self.isp),
            ip: Set(self.ip),
            custom_var_1: Set(v1),
            custom_var_2: Set(v2),
            custom_var_3: Set(v3),
            custom_var_4: Set(v4),
            custom_var_5: Set(v5),
            raw_data: Set(self.raw),
            synced_at: Set(synced_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn visit_normalization_keeps_full_shape_for_sparse_input() {
        let raw = json!({"clickId": "c1"});
        let visit = normalize_visit(&raw);

        assert_eq!(visit.click_id.as_deref(), Some("c1"));
        assert_eq!(visit.campaign_id, None);
        assert_eq!(visit.country_code, None);
        assert!(visit.custom_vars.iter().all(|v| v.is_none()));
        assert_eq!(visit.raw, raw);
    }

    #[test]
    fn visit_country_code_falls_back_to_legacy_key() {
        let visit = normalize_visit(&json!({"clickId": "c1", "country": "US"}));
        assert_eq!(visit.country_code.as_deref(), Some("US"));

        let visit = normalize_visit(&json!({"clickId": "c1", "countryCode": "CA", "country": "US"}));
        assert_eq!(visit.country_code.as_deref(), Some("CA"));
    }

    #[test]
    fn visit_custom_vars_accept_abbreviated_keys() {
        let visit = normalize_visit(&json!({
            "clickId": "c1",
            "customVariable1": "long-form",
            "v2": "short-form",
        }));
        assert_eq!(visit.custom_vars[0].as_deref(), Some("long-form"));
        assert_eq!(visit.custom_vars[1].as_deref(), Some("short-form"));
        assert_eq!(visit.custom_vars[2], None);
    }

    #[test]
    fn visit_timestamp_uses_lossy_normalization() {
        let visit = normalize_visit(&json!({
            "clickId": "c1",
            "timestamp": "2025-12-18 12:52:23 AM",
        }));
        assert_eq!(
            visit.visit_timestamp.as_deref(),
            Some("2025-12-18T00:52:23")
        );

        let visit = normalize_visit(&json!({"clickId": "c1", "timestamp": "not-a-date"}));
        assert_eq!(visit.visit_timestamp.as_deref(), Some("not-a-date"));
    }

    #[test]
    fn conversion_money_fields_never_null_never_panic() {
        let conv = normalize_conversion(&json!({
            "clickId": "c1",
            "revenue": null,
            "payout": 0,
            "cost": null,
            "profit": null,
        }));
        assert_eq!(conv.revenue, 0.0);
        assert_eq!(conv.payout, 0.0);
        assert_eq!(conv.cost, 0.0);
        assert_eq!(conv.profit, 0.0);
    }

    #[test]
    fn conversion_money_accepts_numbers_and_numeric_strings() {
        let conv = normalize_conversion(&json!({
            "clickId": "c1",
            "revenue": 12.5,
            "payout": "3.25",
            "cost": "oops",
        }));
        assert_eq!(conv.revenue, 12.5);
        assert_eq!(conv.payout, 3.25);
        assert_eq!(conv.cost, 0.0);
    }

    #[test]
    fn conversion_missing_postback_becomes_empty_string() {
        let conv = normalize_conversion(&json!({"clickId": "c1"}));
        assert_eq!(conv.postback_timestamp, "");
    }

    #[test]
    fn conversion_transaction_id_falls_back_to_txid() {
        let conv = normalize_conversion(&json!({"clickId": "c1", "txid": "t-9"}));
        assert_eq!(conv.transaction_id.as_deref(), Some("t-9"));
    }

    #[test]
    fn click_normalization_maps_core_fields() {
        let click = normalize_click(&json!({
            "clickId": "c1",
            "campaignId": "camp-1",
            "timestamp": "2025-12-18T10:00:00Z",
            "os": "Android",
        }));
        assert_eq!(click.click_id.as_deref(), Some("c1"));
        assert_eq!(click.campaign_id.as_deref(), Some("camp-1"));
        assert_eq!(
            click.click_timestamp.as_deref(),
            Some("2025-12-18T10:00:00+00:00")
        );
        assert_eq!(click.os.as_deref(), Some("Android"));
    }

    #[test]
    fn into_active_model_stamps_sync_time_and_raw_payload() {
        use sea_orm::ActiveValue;

        let raw = json!({"clickId": "c1", "revenue": 5});
        let synced_at = chrono::Utc::now().fixed_offset();
        let model = normalize_conversion(&raw).into_active_model(synced_at);

        match (&model.click_id, &model.raw_data, &model.synced_at) {
            (
                ActiveValue::Set(click_id),
                ActiveValue::Set(raw_data),
                ActiveValue::Set(at),
            ) => {
                assert_eq!(click_id, "c1");
                assert_eq!(raw_data, &raw);
                assert_eq!(at, &synced_at);
            }
            _ => panic!("expected all fields to be Set"),
        }
    }
}
