use brigade_database::Database;
use brigade_insights::service;
use brigade_kernel::envelope::ApiError;
use chrono::{DateTime, Utc};

async fn test_db() -> Database {
    Database::builder()
        .url("mem://")
        .session("brigade", "test")
        .init()
        .await
        .expect("in-memory database")
}

async fn seed_insight(db: &Database, id: &str, restaurant: &str, created_at: DateTime<Utc>) {
    db.query(
        "CREATE type::thing('insight', $id) SET restaurant = $restaurant, \
         period_from = '2026-08-01', period_to = '2026-08-31', \
         body = 'Revenue held steady.', model = 'test-model', created_at = $created_at",
    )
    .bind(("id", id.to_owned()))
    .bind(("restaurant", restaurant.to_owned()))
    .bind(("created_at", created_at))
    .await
    .expect("seed")
    .check()
    .expect("seed check");
}

fn at(rfc3339: &str) -> DateTime<Utc> {
    rfc3339.parse().expect("timestamp")
}

#[tokio::test]
async fn list_is_newest_first_and_scoped() {
    let db = test_db().await;
    seed_insight(&db, "a", "r1", at("2026-08-01T10:00:00Z")).await;
    seed_insight(&db, "b", "r1", at("2026-08-15T10:00:00Z")).await;
    seed_insight(&db, "c", "r2", at("2026-08-20T10:00:00Z")).await;

    let insights = service::list(&db, "r1").await.expect("list");
    let ids: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[tokio::test]
async fn find_defaults_to_the_newest_digest() {
    let db = test_db().await;
    seed_insight(&db, "old", "r1", at("2026-08-01T10:00:00Z")).await;
    seed_insight(&db, "new", "r1", at("2026-08-15T10:00:00Z")).await;

    let latest = service::find(&db, "r1", None).await.expect("latest");
    assert_eq!(latest.id, "new");

    let named = service::find(&db, "r1", Some("old")).await.expect("by id");
    assert_eq!(named.id, "old");
}

#[tokio::test]
async fn find_misses_are_not_found() {
    let db = test_db().await;
    seed_insight(&db, "a", "r1", at("2026-08-01T10:00:00Z")).await;

    let err = service::find(&db, "r2", None).await.expect_err("empty restaurant");
    assert!(matches!(err, ApiError::NotFound(_)));

    // A digest id from another restaurant must not leak.
    let err = service::find(&db, "r2", Some("a")).await.expect_err("foreign id");
    assert!(matches!(err, ApiError::NotFound(_)));
}
