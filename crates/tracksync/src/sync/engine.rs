//! Sync loops: windowed offset pagination and campaign-scoped sweeps.
//!
//! Two loop shapes share one options struct:
//!
//! - [`sync_conversions`] drives the windowed, offset-paginated conversions
//!   feed until exhaustion. Any fetch or upsert error aborts the loop.
//! - [`sync_visits`] / [`sync_clicks`] sweep the live per-campaign feeds.
//!   Campaigns are independent units of failure: a campaign fetch error is
//!   handled per the configured [`FailureMode`].
//!
//! Both advance the entity's cursor watermark to the window's `to` bound
//! only after the loop completes - an empty run still advances it so the
//! same empty window is not rescanned on every cycle.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;

use crate::store::{self, cursor};
use crate::tracker::{Campaign, RequestPacer, TrackerClient, short_error_message};
use crate::transform::{normalize_click, normalize_conversion, normalize_visit};

use super::dedupe::dedupe_by_key;
use super::types::{
    CAMPAIGN_DISCOVERY_LIMIT, CampaignScope, ConversionKey, EntityKind, EntityOutcome,
    FailureMode, SyncError, SyncOptions, SyncWindow,
};

/// Resolve the window for a windowed sync.
///
/// An explicit window (backfill chunk) bypasses the cursor entirely;
/// otherwise `from` is the persisted watermark, falling back to the
/// configured lookback on first sync, and `to` is now.
async fn resolve_window(
    db: &DatabaseConnection,
    kind: EntityKind,
    lookback: Duration,
    explicit: Option<SyncWindow>,
) -> Result<SyncWindow, SyncError> {
    if let Some(window) = explicit {
        return Ok(window);
    }

    let now = Utc::now();
    let from = match cursor::get(db, kind).await? {
        Some(cursor) => cursor.last_sync_timestamp.with_timezone(&Utc),
        None => now - lookback,
    };
    Ok(SyncWindow { from, to: now })
}

/// Whether a campaign name passes the configured substring filter.
fn matches_filter(name: &str, filter: Option<&str>) -> bool {
    filter.is_none_or(|f| name.contains(f))
}

/// Discover the campaigns a cycle should sweep.
///
/// `ActiveReport` keeps only campaigns with recent traffic; `Listing` takes
/// every campaign whose name matches the filter, paging through the flat
/// listing until a short page.
pub async fn discover_campaigns(
    client: &TrackerClient,
    options: &SyncOptions,
    window: SyncWindow,
) -> Result<Vec<Campaign>, SyncError> {
    let filter = options.campaign_filter.as_deref();

    let campaigns = match options.campaign_scope {
        CampaignScope::ActiveReport => {
            let rows = client
                .campaign_report(window.from, window.to, CAMPAIGN_DISCOVERY_LIMIT)
                .await?;

            rows.iter()
                .filter_map(|row| {
                    let name = row
                        .get("campaignName")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default();
                    if !matches_filter(name, filter) {
                        return None;
                    }
                    let visits = crate::transform::integer(row, &["visits"]);
                    if visits <= 0 {
                        return None;
                    }
                    let id = row.get("campaignId").and_then(|v| v.as_str())?;
                    Some(Campaign {
                        id: id.to_string(),
                        name: name.to_string(),
                        visits,
                    })
                })
                .collect()
        }
        CampaignScope::Listing => {
            let mut all = Vec::new();
            let mut offset = 0u64;
            loop {
                let page = client.list_campaigns(options.page_size, offset).await?;
                let fetched = page.len();
                all.extend(
                    page.into_iter()
                        .filter(|c| matches_filter(&c.name, filter)),
                );
                if fetched < options.page_size as usize {
                    break;
                }
                offset += options.page_size;
            }
            all
        }
    };

    tracing::info!(
        count = campaigns.len(),
        filter = filter.unwrap_or("<none>"),
        scope = ?options.campaign_scope,
        "discovered campaigns"
    );
    Ok(campaigns)
}

/// In-batch dedup key for a normalized conversion under the given policy.
fn conversion_dedup_key(
    conversion: &crate::transform::NormalizedConversion,
    policy: ConversionKey,
) -> String {
    let click_id = conversion.click_id.as_deref().unwrap_or_default();
    match policy {
        ConversionKey::ClickId => click_id.to_string(),
        ConversionKey::ClickIdPostback => {
            format!("{click_id}_{}", conversion.postback_timestamp)
        }
    }
}

/// Sync the conversions feed for a window.
///
/// Pass `Some(window)` to bypass the cursor (backfill); `None` resolves the
/// window from the persisted watermark. Pages are fetched strictly in order;
/// a page shorter than `page_size` is the final page and the loop stops
/// without an extra empty fetch. Errors abort immediately - partial cycles
/// are explicit, never silent.
pub async fn sync_conversions(
    client: &TrackerClient,
    db: &DatabaseConnection,
    options: &SyncOptions,
    window: Option<SyncWindow>,
) -> Result<EntityOutcome, SyncError> {
    let window = resolve_window(db, EntityKind::Conversions, options.lookback, window).await?;
    tracing::info!(
        from = %window.from,
        to = %window.to,
        "syncing conversions"
    );

    let filter = options.campaign_filter.as_deref();
    let synced_at = Utc::now().fixed_offset();
    let mut total = 0usize;
    let mut offset = 0u64;

    loop {
        let rows = client
            .conversions_page(window.from, window.to, options.page_size, offset)
            .await?;
        if rows.is_empty() {
            break;
        }
        let fetched = rows.len();

        let normalized: Vec<_> = rows
            .iter()
            .map(normalize_conversion)
            .filter(|c| c.click_id.is_some())
            .filter(|c| matches_filter(c.campaign_name.as_deref().unwrap_or_default(), filter))
            .collect();
        let unique = dedupe_by_key(normalized, |c| {
            conversion_dedup_key(c, options.conversion_key)
        });

        if !unique.is_empty() {
            let count = unique.len();
            let models = unique
                .into_iter()
                .map(|c| c.into_active_model(synced_at))
                .collect();
            store::upsert_conversions(db, models).await?;
            total += count;
            tracing::info!(count, offset, "upserted conversions page");
        }

        if fetched < options.page_size as usize {
            break;
        }
        offset += options.page_size;
    }

    cursor::advance(db, EntityKind::Conversions, window.to, total).await?;
    tracing::info!(total, "conversions sync complete");

    Ok(EntityOutcome {
        kind: EntityKind::Conversions,
        synced: total,
        window,
    })
}

/// Which live feed a campaign sweep pulls.
#[derive(Debug, Clone, Copy)]
enum LiveFeed {
    Visits,
    Clicks,
}

impl LiveFeed {
    fn entity_kind(self) -> EntityKind {
        match self {
            LiveFeed::Visits => EntityKind::Visits,
            LiveFeed::Clicks => EntityKind::Clicks,
        }
    }
}

/// Sweep the live feed of every campaign, one fetch per campaign.
///
/// Dedup is sweep-wide: the first occurrence of a click id wins across
/// campaigns as well as within a page. The failure-mode flag decides whether
/// a campaign fetch error skips that campaign or aborts the sweep; upsert
/// errors always abort.
async fn campaign_sweep(
    client: &TrackerClient,
    db: &DatabaseConnection,
    options: &SyncOptions,
    campaigns: &[Campaign],
    feed: LiveFeed,
) -> Result<EntityOutcome, SyncError> {
    let kind = feed.entity_kind();
    let window = resolve_window(db, kind, options.lookback, None).await?;
    tracing::info!(entity = %kind, campaigns = campaigns.len(), "starting campaign sweep");

    let pacer = RequestPacer::new(options.pace_every, options.pace_pause);
    let synced_at = Utc::now().fixed_offset();
    let mut seen: HashSet<String> = HashSet::new();
    let mut total = 0usize;

    for campaign in campaigns {
        pacer.tick().await;

        let fetched = match feed {
            LiveFeed::Visits => client.live_visits(&campaign.id, options.live_limit).await,
            LiveFeed::Clicks => client.live_clicks(&campaign.id, options.live_limit).await,
        };

        let rows = match fetched {
            Ok(rows) => rows,
            Err(e) => match options.failure_mode {
                FailureMode::SkipAndContinue => {
                    tracing::warn!(
                        entity = %kind,
                        campaign = %campaign.id,
                        error = %short_error_message(&e),
                        "campaign fetch failed, skipping"
                    );
                    continue;
                }
                FailureMode::AbortCycle => return Err(e.into()),
            },
        };

        if rows.is_empty() {
            continue;
        }

        let written = match feed {
            LiveFeed::Visits => {
                let batch: Vec<_> = rows
                    .iter()
                    .map(normalize_visit)
                    .filter_map(|v| {
                        let id = v.click_id.clone()?;
                        seen.insert(id).then_some(v)
                    })
                    .map(|v| v.into_active_model(synced_at))
                    .collect();
                let count = batch.len();
                store::upsert_visits(db, batch).await?;
                count
            }
            LiveFeed::Clicks => {
                let batch: Vec<_> = rows
                    .iter()
                    .map(normalize_click)
                    .filter_map(|c| {
                        let id = c.click_id.clone()?;
                        seen.insert(id).then_some(c)
                    })
                    .map(|c| c.into_active_model(synced_at))
                    .collect();
                let count = batch.len();
                store::upsert_clicks(db, batch).await?;
                count
            }
        };

        if written > 0 {
            total += written;
            tracing::debug!(
                entity = %kind,
                campaign = %campaign.id,
                count = written,
                "upserted campaign batch"
            );
        }
    }

    cursor::advance(db, kind, window.to, total).await?;
    tracing::info!(entity = %kind, total, "campaign sweep complete");

    Ok(EntityOutcome {
        kind,
        synced: total,
        window,
    })
}

/// Sync the live visit feed across the discovered campaigns.
pub async fn sync_visits(
    client: &TrackerClient,
    db: &DatabaseConnection,
    options: &SyncOptions,
    campaigns: &[Campaign],
) -> Result<EntityOutcome, SyncError> {
    campaign_sweep(client, db, options, campaigns, LiveFeed::Visits).await
}

/// Sync the live click feed across the discovered campaigns.
pub async fn sync_clicks(
    client: &TrackerClient,
    db: &DatabaseConnection,
    options: &SyncOptions,
    campaigns: &[Campaign],
) -> Result<EntityOutcome, SyncError> {
    campaign_sweep(client, db, options, campaigns, LiveFeed::Clicks).await
}

#[cfg(all(test, feature = "migrate"))]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use sea_orm::EntityTrait;
    use serde_json::json;

    use crate::db::connect_and_migrate;
    use crate::entity::prelude::*;
    use crate::http::{HttpMethod, MockTransport};
    use crate::tracker::Credentials;
    use crate::tracker::client::format_report_time;

    use super::*;

    const BASE: &str = "https://api.tracker.test";

    fn client(transport: &MockTransport) -> TrackerClient {
        TrackerClient::new_with_transport(
            BASE,
            Credentials::new("id-1", "key-1"),
            Arc::new(transport.clone()),
        )
    }

    fn push_session(transport: &MockTransport) {
        transport.push_json(
            HttpMethod::Post,
            format!("{BASE}/auth/access/session"),
            serde_json::json!({"token": "tok-1"}),
        );
    }

    async fn test_db() -> DatabaseConnection {
        connect_and_migrate("sqlite::memory:")
            .await
            .expect("in-memory database should initialize")
    }

    fn fixed_window() -> SyncWindow {
        SyncWindow {
            from: Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap(),
        }
    }

    fn conversions_url(
        client: &TrackerClient,
        window: &SyncWindow,
        limit: u64,
        offset: u64,
    ) -> String {
        client
            .url_for(
                "/report/conversions",
                &[
                    ("from", format_report_time(window.from)),
                    ("to", format_report_time(window.to)),
                    ("tz", "UTC".to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .expect("url should build")
    }

    fn live_url(client: &TrackerClient, feed: &str, campaign: &str, limit: u64) -> String {
        client
            .url_for(
                &format!("/report/live/{feed}/{campaign}"),
                &[("limit", limit.to_string())],
            )
            .expect("url should build")
    }

    fn conversion_row(click_id: &str, campaign_name: &str, revenue: f64) -> serde_json::Value {
        json!({
            "clickId": click_id,
            "postbackTimestamp": "2026-08-06T01:00:00Z",
            "campaignId": "camp-1",
            "campaignName": campaign_name,
            "revenue": revenue,
            "payout": 0,
        })
    }

    fn campaign(id: &str) -> Campaign {
        Campaign {
            id: id.to_string(),
            name: format!("Campaign {id}"),
            visits: 10,
        }
    }

    async fn stored_cursor(db: &DatabaseConnection, kind: EntityKind) -> Option<SyncCursorModel> {
        cursor::get(db, kind).await.expect("cursor lookup")
    }

    #[tokio::test]
    async fn conversions_pagination_stops_on_short_page_without_extra_fetch() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);
        let db = test_db().await;

        let options = SyncOptions {
            page_size: 2,
            ..SyncOptions::default()
        };
        let window = fixed_window();

        // Full page, then a short page: the loop must not fetch a third.
        transport.push_json(
            HttpMethod::Get,
            conversions_url(&client, &window, 2, 0),
            json!({"rows": [
                conversion_row("c1", "Any", 1.0),
                conversion_row("c2", "Any", 2.0),
            ]}),
        );
        transport.push_json(
            HttpMethod::Get,
            conversions_url(&client, &window, 2, 2),
            json!({"rows": [conversion_row("c3", "Any", 3.0)]}),
        );

        let outcome = sync_conversions(&client, &db, &options, Some(window))
            .await
            .expect("sync should succeed");

        assert_eq!(outcome.synced, 3);
        // One auth call plus exactly two page fetches.
        assert_eq!(transport.request_count(), 3);
        assert_eq!(Conversion::find().all(&db).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn empty_result_still_advances_the_cursor() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);
        let db = test_db().await;

        let options = SyncOptions::default();
        let window = fixed_window();
        transport.push_json(
            HttpMethod::Get,
            conversions_url(&client, &window, options.page_size, 0),
            json!({"rows": []}),
        );

        let outcome = sync_conversions(&client, &db, &options, Some(window.clone()))
            .await
            .expect("sync should succeed");

        assert_eq!(outcome.synced, 0);
        let cursor = stored_cursor(&db, EntityKind::Conversions)
            .await
            .expect("cursor row should exist");
        assert_eq!(
            cursor.last_sync_timestamp.with_timezone(&Utc),
            window.to
        );
        assert_eq!(cursor.records_synced, 0);
    }

    #[tokio::test]
    async fn campaign_filter_keeps_only_matching_conversions() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);
        let db = test_db().await;

        let options = SyncOptions {
            campaign_filter: Some("Mobile".to_string()),
            ..SyncOptions::default()
        };
        let window = fixed_window();
        transport.push_json(
            HttpMethod::Get,
            conversions_url(&client, &window, options.page_size, 0),
            json!({"rows": [
                conversion_row("c1", "Mobile US", 1.0),
                conversion_row("c2", "Desktop DE", 2.0),
                conversion_row("c3", "Mobile UK", 3.0),
            ]}),
        );

        let outcome = sync_conversions(&client, &db, &options, Some(window))
            .await
            .expect("sync should succeed");

        assert_eq!(outcome.synced, 2);
        let stored = Conversion::find().all(&db).await.unwrap();
        let mut ids: Vec<_> = stored.iter().map(|c| c.click_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["c1", "c3"]);
    }

    #[tokio::test]
    async fn duplicate_click_ids_collapse_to_first_occurrence_under_click_id_policy() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);
        let db = test_db().await;

        let options = SyncOptions {
            conversion_key: ConversionKey::ClickId,
            ..SyncOptions::default()
        };
        let window = fixed_window();
        transport.push_json(
            HttpMethod::Get,
            conversions_url(&client, &window, options.page_size, 0),
            json!({"rows": [
                conversion_row("c1", "Any", 1.0),
                conversion_row("c1", "Any", 2.0),
                conversion_row("c1", "Any", 3.0),
            ]}),
        );

        let outcome = sync_conversions(&client, &db, &options, Some(window))
            .await
            .expect("sync should succeed");

        assert_eq!(outcome.synced, 1);
        let stored = Conversion::find().all(&db).await.unwrap();
        assert_eq!(stored.len(), 1);
        // First occurrence wins.
        assert_eq!(stored[0].revenue, 1.0);
    }

    #[tokio::test]
    async fn postback_policy_keeps_distinct_postbacks_for_one_click() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);
        let db = test_db().await;

        let options = SyncOptions::default();
        let window = fixed_window();
        let mut second = conversion_row("c1", "Any", 2.0);
        second["postbackTimestamp"] = json!("2026-08-06T02:00:00Z");
        transport.push_json(
            HttpMethod::Get,
            conversions_url(&client, &window, options.page_size, 0),
            json!({"rows": [conversion_row("c1", "Any", 1.0), second]}),
        );

        let outcome = sync_conversions(&client, &db, &options, Some(window))
            .await
            .expect("sync should succeed");

        assert_eq!(outcome.synced, 2);
        assert_eq!(Conversion::find().all(&db).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reupserting_the_same_rows_is_idempotent() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);
        let db = test_db().await;

        let options = SyncOptions::default();
        let window = fixed_window();
        let url = conversions_url(&client, &window, options.page_size, 0);
        let page = json!({"rows": [conversion_row("c1", "Any", 5.0)]});
        transport.push_json(HttpMethod::Get, url.clone(), page.clone());
        transport.push_json(HttpMethod::Get, url, page);

        sync_conversions(&client, &db, &options, Some(window.clone()))
            .await
            .expect("first sync");
        sync_conversions(&client, &db, &options, Some(window))
            .await
            .expect("second sync");

        let stored = Conversion::find().all(&db).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].revenue, 5.0);
    }

    #[tokio::test]
    async fn fetch_error_aborts_conversions_sync_without_advancing_cursor() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);
        let db = test_db().await;

        let options = SyncOptions::default();
        let window = fixed_window();
        transport.push_status(
            HttpMethod::Get,
            conversions_url(&client, &window, options.page_size, 0),
            500,
            "boom",
        );

        let err = sync_conversions(&client, &db, &options, Some(window))
            .await
            .expect_err("page error should abort the loop");
        assert!(matches!(err, SyncError::Tracker(_)));
        assert!(stored_cursor(&db, EntityKind::Conversions).await.is_none());
    }

    #[tokio::test]
    async fn sweep_skips_failed_campaigns_in_skip_mode() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);
        let db = test_db().await;

        let options = SyncOptions::default();
        transport.push_status(
            HttpMethod::Get,
            live_url(&client, "visits", "camp-bad", options.live_limit),
            500,
            "boom",
        );
        transport.push_json(
            HttpMethod::Get,
            live_url(&client, "visits", "camp-ok", options.live_limit),
            json!({"rows": [{"clickId": "v1", "campaignId": "camp-ok"}]}),
        );

        let campaigns = [campaign("camp-bad"), campaign("camp-ok")];
        let outcome = sync_visits(&client, &db, &options, &campaigns)
            .await
            .expect("skip mode should tolerate the failed campaign");

        assert_eq!(outcome.synced, 1);
        assert_eq!(Visit::find().all(&db).await.unwrap().len(), 1);
        // Sweep completed, so the cursor still advances.
        assert!(stored_cursor(&db, EntityKind::Visits).await.is_some());
    }

    #[tokio::test]
    async fn sweep_aborts_on_failed_campaign_in_abort_mode() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);
        let db = test_db().await;

        let options = SyncOptions {
            failure_mode: FailureMode::AbortCycle,
            ..SyncOptions::default()
        };
        transport.push_status(
            HttpMethod::Get,
            live_url(&client, "visits", "camp-bad", options.live_limit),
            500,
            "boom",
        );

        let campaigns = [campaign("camp-bad"), campaign("camp-ok")];
        let err = sync_visits(&client, &db, &options, &campaigns)
            .await
            .expect_err("abort mode should propagate the first campaign error");

        assert!(matches!(err, SyncError::Tracker(_)));
        // camp-ok was never fetched: auth + one failed live call.
        assert_eq!(transport.request_count(), 2);
        assert!(stored_cursor(&db, EntityKind::Visits).await.is_none());
    }

    #[tokio::test]
    async fn sweep_dedupes_click_ids_across_campaigns() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);
        let db = test_db().await;

        let options = SyncOptions::default();
        // The same click id surfaces in both campaigns' buffers.
        transport.push_json(
            HttpMethod::Get,
            live_url(&client, "clicks", "camp-1", options.live_limit),
            json!({"rows": [{"clickId": "k1", "os": "Android"}]}),
        );
        transport.push_json(
            HttpMethod::Get,
            live_url(&client, "clicks", "camp-2", options.live_limit),
            json!({"rows": [{"clickId": "k1", "os": "iOS"}, {"clickId": "k2"}]}),
        );

        let campaigns = [campaign("camp-1"), campaign("camp-2")];
        let outcome = sync_clicks(&client, &db, &options, &campaigns)
            .await
            .expect("sweep should succeed");

        assert_eq!(outcome.synced, 2);
        let stored = Click::find().all(&db).await.unwrap();
        assert_eq!(stored.len(), 2);
        let k1 = stored.iter().find(|c| c.click_id == "k1").unwrap();
        // First occurrence wins.
        assert_eq!(k1.os.as_deref(), Some("Android"));
    }

    #[tokio::test]
    async fn sweep_drops_rows_without_click_ids() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);
        let db = test_db().await;

        let options = SyncOptions::default();
        transport.push_json(
            HttpMethod::Get,
            live_url(&client, "visits", "camp-1", options.live_limit),
            json!({"rows": [{"campaignId": "camp-1"}, {"clickId": "v1"}]}),
        );

        let campaigns = [campaign("camp-1")];
        let outcome = sync_visits(&client, &db, &options, &campaigns)
            .await
            .expect("sweep should succeed");

        assert_eq!(outcome.synced, 1);
    }

    #[tokio::test]
    async fn discovery_active_report_filters_by_name_and_traffic() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);

        let options = SyncOptions {
            campaign_filter: Some("Mobile".to_string()),
            ..SyncOptions::default()
        };
        let window = fixed_window();
        let url = client
            .url_for(
                "/report",
                &[
                    ("from", format_report_time(window.from)),
                    ("to", format_report_time(window.to)),
                    ("tz", "UTC".to_string()),
                    ("groupBy", "campaign".to_string()),
                    ("limit", CAMPAIGN_DISCOVERY_LIMIT.to_string()),
                ],
            )
            .expect("url");
        transport.push_json(
            HttpMethod::Get,
            url,
            json!({"rows": [
                {"campaignId": "c1", "campaignName": "Mobile US", "visits": 12},
                {"campaignId": "c2", "campaignName": "Mobile DE", "visits": 0},
                {"campaignId": "c3", "campaignName": "Desktop US", "visits": 40},
            ]}),
        );

        let campaigns = discover_campaigns(&client, &options, window)
            .await
            .expect("discovery should succeed");

        assert_eq!(campaigns.len(), 1);
        assert_eq!(campaigns[0].id, "c1");
        assert_eq!(campaigns[0].visits, 12);
    }

    #[tokio::test]
    async fn discovery_listing_pages_until_short_page() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);

        let options = SyncOptions {
            page_size: 2,
            campaign_scope: CampaignScope::Listing,
            campaign_filter: Some("Keep".to_string()),
            ..SyncOptions::default()
        };

        let page_url = |offset: u64| {
            client
                .url_for(
                    "/campaign",
                    &[("limit", "2".to_string()), ("offset", offset.to_string())],
                )
                .expect("url")
        };
        transport.push_json(
            HttpMethod::Get,
            page_url(0),
            json!({"campaigns": [
                {"id": "c1", "name": "Keep A"},
                {"id": "c2", "name": "Drop B"},
            ]}),
        );
        transport.push_json(
            HttpMethod::Get,
            page_url(2),
            json!({"campaigns": [{"id": "c3", "name": "Keep C"}]}),
        );

        let campaigns = discover_campaigns(&client, &options, fixed_window())
            .await
            .expect("discovery should succeed");

        let ids: Vec<_> = campaigns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c3"]);
        // Auth + two listing pages, no third fetch.
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn backfill_window_does_not_regress_the_watermark() {
        let transport = MockTransport::new();
        push_session(&transport);
        let client = client(&transport);
        let db = test_db().await;

        let options = SyncOptions::default();

        // Recent sync first.
        let recent = fixed_window();
        transport.push_json(
            HttpMethod::Get,
            conversions_url(&client, &recent, options.page_size, 0),
            json!({"rows": []}),
        );
        sync_conversions(&client, &db, &options, Some(recent.clone()))
            .await
            .expect("recent sync");

        // Then a historical chunk ending before the stored watermark.
        let historical = SyncWindow {
            from: recent.from - Duration::days(14),
            to: recent.from - Duration::days(7),
        };
        transport.push_json(
            HttpMethod::Get,
            conversions_url(&client, &historical, options.page_size, 0),
            json!({"rows": []}),
        );
        sync_conversions(&client, &db, &options, Some(historical))
            .await
            .expect("historical sync");

        let cursor = stored_cursor(&db, EntityKind::Conversions)
            .await
            .expect("cursor row");
        assert_eq!(cursor.last_sync_timestamp.with_timezone(&Utc), recent.to);
    }

    #[test]
    fn matches_filter_handles_all_cases() {
        assert!(matches_filter("Mobile US", None));
        assert!(matches_filter("Mobile US", Some("Mobile")));
        assert!(!matches_filter("Desktop", Some("Mobile")));
        assert!(!matches_filter("", Some("Mobile")));
    }
}
