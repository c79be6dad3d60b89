//! Integration tests for the store layer against a real SQLite database.
//!
//! These cover the properties the engine relies on: natural-key upserts are
//! idempotent and last-write-wins, the conversion key is composite, the
//! cursor watermark is monotonic, and retention deletes strictly by age.

use chrono::{Duration, Utc};
use sea_orm::EntityTrait;
use serde_json::json;

use tracksync::connect_and_migrate;
use tracksync::entity::prelude::*;
use tracksync::store;
use tracksync::transform::{normalize_conversion, normalize_visit};

async fn setup_db() -> sea_orm::DatabaseConnection {
    connect_and_migrate("sqlite::memory:")
        .await
        .expect("in-memory database should initialize")
}

fn visit_model(click_id: &str, os: &str) -> VisitActiveModel {
    normalize_visit(&json!({"clickId": click_id, "os": os}))
        .into_active_model(Utc::now().fixed_offset())
}

fn conversion_model(click_id: &str, postback: &str, revenue: f64) -> ConversionActiveModel {
    normalize_conversion(&json!({
        "clickId": click_id,
        "postbackTimestamp": postback,
        "revenue": revenue,
    }))
    .into_active_model(Utc::now().fixed_offset())
}

#[tokio::test]
async fn migrations_apply_cleanly_to_a_fresh_database() {
    let db = setup_db().await;

    // All four tables exist and are queryable.
    assert!(Visit::find().all(&db).await.unwrap().is_empty());
    assert!(Click::find().all(&db).await.unwrap().is_empty());
    assert!(Conversion::find().all(&db).await.unwrap().is_empty());
    assert!(SyncCursor::find().all(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn visit_upsert_is_idempotent_by_click_id() {
    let db = setup_db().await;

    store::upsert_visits(&db, vec![visit_model("c1", "Android")])
        .await
        .expect("first upsert");
    store::upsert_visits(&db, vec![visit_model("c1", "Android")])
        .await
        .expect("second upsert");

    let stored = Visit::find().all(&db).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].os.as_deref(), Some("Android"));
}

#[tokio::test]
async fn visit_upsert_overwrites_with_latest_values() {
    let db = setup_db().await;

    store::upsert_visits(&db, vec![visit_model("c1", "Android")])
        .await
        .expect("first upsert");
    store::upsert_visits(&db, vec![visit_model("c1", "iOS")])
        .await
        .expect("second upsert");

    let stored = Visit::find().all(&db).await.unwrap();
    assert_eq!(stored.len(), 1);
    // Last write wins, no conflict detection.
    assert_eq!(stored[0].os.as_deref(), Some("iOS"));
}

#[tokio::test]
async fn conversion_key_is_composite_over_click_and_postback() {
    let db = setup_db().await;

    store::upsert_conversions(
        &db,
        vec![
            conversion_model("c1", "2026-08-06T01:00:00Z", 1.0),
            conversion_model("c1", "2026-08-06T02:00:00Z", 2.0),
        ],
    )
    .await
    .expect("insert two postbacks");

    // Re-delivering the first postback overwrites it in place.
    store::upsert_conversions(&db, vec![conversion_model("c1", "2026-08-06T01:00:00Z", 9.0)])
        .await
        .expect("redeliver first postback");

    let mut stored = Conversion::find().all(&db).await.unwrap();
    stored.sort_by(|a, b| a.postback_timestamp.cmp(&b.postback_timestamp));
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].revenue, 9.0);
    assert_eq!(stored[1].revenue, 2.0);
}

#[tokio::test]
async fn missing_postback_timestamps_share_one_row_per_click() {
    let db = setup_db().await;

    let no_postback = |revenue: f64| {
        normalize_conversion(&json!({"clickId": "c1", "revenue": revenue}))
            .into_active_model(Utc::now().fixed_offset())
    };

    store::upsert_conversions(&db, vec![no_postback(1.0)])
        .await
        .expect("first upsert");
    store::upsert_conversions(&db, vec![no_postback(2.0)])
        .await
        .expect("second upsert");

    let stored = Conversion::find().all(&db).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].postback_timestamp, "");
    assert_eq!(stored[0].revenue, 2.0);
}

#[tokio::test]
async fn cursor_watermark_never_moves_backward() {
    let db = setup_db().await;
    let recent = Utc::now();
    let older = recent - Duration::days(7);

    store::cursor::advance(&db, EntityKind::Conversions, recent, 10)
        .await
        .expect("advance to recent");
    store::cursor::advance(&db, EntityKind::Conversions, older, 3)
        .await
        .expect("attempt to regress");

    let cursor = store::cursor::get(&db, EntityKind::Conversions)
        .await
        .expect("lookup")
        .expect("row exists");
    assert_eq!(
        cursor.last_sync_timestamp.with_timezone(&Utc).timestamp(),
        recent.timestamp()
    );
    // The guarded upsert leaves the whole row untouched on regression.
    assert_eq!(cursor.records_synced, 10);
}

#[tokio::test]
async fn cursor_advances_forward_and_tracks_latest_count() {
    let db = setup_db().await;
    let first = Utc::now() - Duration::hours(2);
    let second = Utc::now();

    store::cursor::advance(&db, EntityKind::Visits, first, 5)
        .await
        .expect("first advance");
    store::cursor::advance(&db, EntityKind::Visits, second, 0)
        .await
        .expect("second advance");

    let cursor = store::cursor::get(&db, EntityKind::Visits)
        .await
        .expect("lookup")
        .expect("row exists");
    assert_eq!(
        cursor.last_sync_timestamp.with_timezone(&Utc).timestamp(),
        second.timestamp()
    );
    // An empty run still advances and records its zero count.
    assert_eq!(cursor.records_synced, 0);
}

#[tokio::test]
async fn cursors_are_tracked_independently_per_entity() {
    let db = setup_db().await;
    let now = Utc::now();

    store::cursor::advance(&db, EntityKind::Visits, now, 1)
        .await
        .expect("visits advance");
    store::cursor::advance(&db, EntityKind::Clicks, now - Duration::hours(1), 2)
        .await
        .expect("clicks advance");

    assert!(
        store::cursor::get(&db, EntityKind::Conversions)
            .await
            .expect("lookup")
            .is_none()
    );
    let visits = store::cursor::get(&db, EntityKind::Visits)
        .await
        .expect("lookup")
        .expect("row exists");
    assert_eq!(visits.records_synced, 1);
}

#[tokio::test]
async fn retention_purges_only_rows_past_the_cutoff() {
    let db = setup_db().await;

    let old_stamp = (Utc::now() - Duration::days(120)).fixed_offset();
    let fresh_stamp = Utc::now().fixed_offset();

    let old_visit = normalize_visit(&json!({"clickId": "old"})).into_active_model(old_stamp);
    let fresh_visit = normalize_visit(&json!({"clickId": "fresh"})).into_active_model(fresh_stamp);

    store::upsert_visits(&db, vec![old_visit, fresh_visit])
        .await
        .expect("seed visits");

    let report = store::purge_older_than(&db, 90).await.expect("purge");
    assert_eq!(report.visits_deleted, 1);
    assert_eq!(report.total(), 1);

    let remaining = Visit::find().all(&db).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].click_id, "fresh");
}
