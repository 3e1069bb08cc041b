use brigade_billing::models::{Plan, Subscription, SubscriptionStatus};
use brigade_billing::service;
use brigade_database::Database;

async fn test_db() -> Database {
    Database::builder()
        .url("mem://")
        .session("brigade", "test")
        .init()
        .await
        .expect("in-memory database")
}

#[tokio::test]
async fn cache_miss_is_none() {
    let db = test_db().await;
    let cached = service::cached_subscription(&db, "r1").await.expect("lookup");
    assert!(cached.is_none());
}

#[tokio::test]
async fn store_then_read_roundtrip() {
    let db = test_db().await;
    let sub = Subscription {
        restaurant: "r1".to_owned(),
        customer_id: "cus_123".to_owned(),
        status: SubscriptionStatus::Active,
        plan: Plan::Growth,
    };

    service::store_subscription(&db, &sub).await.expect("store");
    let cached = service::cached_subscription(&db, "r1").await.expect("lookup");
    assert_eq!(cached, Some(sub));
}

#[tokio::test]
async fn restore_overwrites_the_single_row_per_restaurant() {
    let db = test_db().await;
    let mut sub = Subscription {
        restaurant: "r1".to_owned(),
        customer_id: "cus_123".to_owned(),
        status: SubscriptionStatus::Active,
        plan: Plan::Starter,
    };
    service::store_subscription(&db, &sub).await.expect("first store");

    sub.status = SubscriptionStatus::PastDue;
    sub.plan = Plan::Chain;
    service::store_subscription(&db, &sub).await.expect("second store");

    let rows: Vec<String> = db
        .query("SELECT VALUE customer_id FROM subscription")
        .await
        .expect("query")
        .take(0)
        .expect("rows");
    assert_eq!(rows.len(), 1);

    let cached = service::cached_subscription(&db, "r1").await.expect("lookup");
    assert_eq!(cached, Some(sub));
}

#[tokio::test]
async fn restaurants_do_not_share_subscriptions() {
    let db = test_db().await;
    let sub = Subscription {
        restaurant: "r1".to_owned(),
        customer_id: "cus_123".to_owned(),
        status: SubscriptionStatus::Active,
        plan: Plan::Starter,
    };
    service::store_subscription(&db, &sub).await.expect("store");

    let other = service::cached_subscription(&db, "r2").await.expect("lookup");
    assert!(other.is_none());
}
