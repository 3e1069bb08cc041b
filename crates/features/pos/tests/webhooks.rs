use brigade_database::Database;
use brigade_domain::events::SalesSynced;
use brigade_domain::money::Cents;
use brigade_domain::vendor::PosVendor;
use brigade_events::EventBus;
use brigade_pos::normalize::normalize;
use brigade_pos::service;
use chrono::NaiveDate;
use serde_json::json;

async fn test_db() -> Database {
    Database::builder()
        .url("mem://")
        .session("brigade", "test")
        .init()
        .await
        .expect("in-memory database")
}

fn square_payment(id: &str, at: &str, total: i64, tax: i64, tip: i64) -> serde_json::Value {
    json!({
        "data": { "object": { "payment": {
            "id": id,
            "created_at": at,
            "total_money": { "amount": total },
            "tax_money": { "amount": tax },
            "tip_money": { "amount": tip },
            "source_type": "CARD"
        }}}
    })
}

#[tokio::test]
async fn replayed_webhook_does_not_double_count() {
    let db = test_db().await;
    let events = EventBus::default();

    let order = normalize(
        PosVendor::Square,
        &square_payment("pay_1", "2026-08-24T18:30:00Z", 1280, 80, 200),
    )
    .expect("normalize");

    let first = service::ingest(&db, &events, "r1", &order).await.expect("first ingest");
    let replay = service::ingest(&db, &events, "r1", &order).await.expect("replayed ingest");

    assert_eq!(first.orders, 1);
    assert_eq!(replay.orders, 1);
    assert_eq!(replay.gross_cents, Cents(1280));
}

#[tokio::test]
async fn daily_totals_span_vendors_but_not_days() {
    let db = test_db().await;
    let events = EventBus::default();

    let square = normalize(
        PosVendor::Square,
        &square_payment("pay_2", "2026-08-24T12:00:00Z", 1000, 70, 100),
    )
    .expect("square");
    let toast = normalize(
        PosVendor::Toast,
        &json!({
            "guid": "ord-1",
            "closedDate": "2026-08-24T19:45:00Z",
            "totalAmount": 25.00,
            "taxAmount": 1.75,
            "tipAmount": 4.00
        }),
    )
    .expect("toast");
    let next_day = normalize(
        PosVendor::Square,
        &square_payment("pay_3", "2026-08-25T00:10:00Z", 9999, 0, 0),
    )
    .expect("next day");

    service::ingest(&db, &events, "r1", &square).await.expect("ingest square");
    service::ingest(&db, &events, "r1", &toast).await.expect("ingest toast");
    service::ingest(&db, &events, "r1", &next_day).await.expect("ingest next day");

    let date = NaiveDate::from_ymd_opt(2026, 8, 24).expect("date");
    let summary = service::daily_sales(&db, "r1", date).await.expect("summary");
    assert_eq!(summary.orders, 2);
    assert_eq!(summary.gross_cents, Cents(1000 + 2500));
    assert_eq!(summary.tax_cents, Cents(70 + 175));
    assert_eq!(summary.tip_cents, Cents(100 + 400));
}

#[tokio::test]
async fn ingest_publishes_recomputed_day_totals() {
    let db = test_db().await;
    let events = EventBus::default();
    let mut rx = events.subscribe::<SalesSynced>().expect("subscribe");

    let first = normalize(
        PosVendor::Square,
        &square_payment("pay_4", "2026-08-24T10:00:00Z", 500, 0, 0),
    )
    .expect("first");
    let second = normalize(
        PosVendor::Square,
        &square_payment("pay_5", "2026-08-24T11:00:00Z", 700, 50, 0),
    )
    .expect("second");

    service::ingest(&db, &events, "r1", &first).await.expect("ingest first");
    service::ingest(&db, &events, "r1", &second).await.expect("ingest second");

    let event = rx.recv().await.expect("first event");
    assert_eq!(event.orders, 1);
    assert_eq!(event.gross_cents, Cents(500));

    let event = rx.recv().await.expect("second event");
    assert_eq!(event.restaurant, "r1");
    assert_eq!(event.date, NaiveDate::from_ymd_opt(2026, 8, 24).expect("date"));
    assert_eq!(event.orders, 2);
    assert_eq!(event.gross_cents, Cents(1200));
    assert_eq!(event.tax_cents, Cents(50));
}

#[tokio::test]
async fn sales_are_scoped_to_their_restaurant() {
    let db = test_db().await;
    let events = EventBus::default();

    let order = normalize(
        PosVendor::Square,
        &square_payment("pay_6", "2026-08-24T10:00:00Z", 800, 0, 0),
    )
    .expect("normalize");
    service::ingest(&db, &events, "r1", &order).await.expect("ingest");

    let date = NaiveDate::from_ymd_opt(2026, 8, 24).expect("date");
    let other = service::daily_sales(&db, "r2", date).await.expect("other restaurant");
    assert_eq!(other.orders, 0);
    assert_eq!(other.gross_cents, Cents::ZERO);
}
