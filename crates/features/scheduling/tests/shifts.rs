use brigade_database::Database;
use brigade_domain::role::Role;
use brigade_identity::Member;
use brigade_kernel::envelope::ApiError;
use brigade_scheduling::models::{CreateShift, UpdateShift};
use brigade_scheduling::service;
use chrono::{DateTime, Duration, NaiveDate, Utc};

async fn test_db() -> Database {
    Database::builder()
        .url("mem://")
        .session("brigade", "test")
        .init()
        .await
        .expect("in-memory database")
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2026, 8, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
}

fn shift_request(employee: &str, day: u32, from: u32, to: u32) -> CreateShift {
    CreateShift {
        restaurant: "r1".to_owned(),
        employee: employee.to_owned(),
        position: "line-cook".to_owned(),
        starts_at: at(day, from),
        ends_at: at(day, to),
    }
}

fn manager() -> Member {
    Member { user: "mgr".to_owned(), restaurant: "r1".to_owned(), role: Role::Manager }
}

fn staff(user: &str) -> Member {
    Member { user: user.to_owned(), restaurant: "r1".to_owned(), role: Role::Staff }
}

#[tokio::test]
async fn create_and_fetch_week() {
    let db = test_db().await;
    service::create(&db, shift_request("alice", 24, 9, 17)).await.expect("create");
    service::create(&db, shift_request("bob", 25, 9, 17)).await.expect("create");
    // Next week; must not appear.
    service::create(&db, shift_request("alice", 31, 9, 17)).await.expect("create");

    let week = service::week(&db, "r1", NaiveDate::from_ymd_opt(2026, 8, 26).unwrap())
        .await
        .expect("week");
    assert_eq!(week.len(), 2);
    assert_eq!(week[0].employee, "alice");
    assert_eq!(week[1].employee, "bob");
}

#[tokio::test]
async fn rejects_inverted_window() {
    let db = test_db().await;
    let mut req = shift_request("alice", 24, 17, 17);
    req.ends_at = at(24, 9);
    let err = service::create(&db, req).await.expect_err("inverted window");
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn rejects_overlapping_shift_for_same_employee() {
    let db = test_db().await;
    service::create(&db, shift_request("alice", 24, 9, 17)).await.expect("create");

    let err = service::create(&db, shift_request("alice", 24, 16, 22))
        .await
        .expect_err("overlap");
    assert!(matches!(err, ApiError::Conflict(_)));

    // A different employee may take the same window.
    service::create(&db, shift_request("bob", 24, 16, 22)).await.expect("no overlap across staff");
}

#[tokio::test]
async fn update_moves_window_and_respects_overlaps() {
    let db = test_db().await;
    let shift = service::create(&db, shift_request("alice", 24, 9, 13)).await.expect("create");
    service::create(&db, shift_request("alice", 24, 14, 18)).await.expect("second");

    // Shrinking within a free window is fine.
    let updated = service::update(
        &db,
        &shift.id,
        UpdateShift {
            restaurant: "r1".to_owned(),
            position: Some("expo".to_owned()),
            starts_at: Some(at(24, 10)),
            ends_at: Some(at(24, 13)),
        },
    )
    .await
    .expect("update");
    assert_eq!(updated.position, "expo");
    assert_eq!(updated.starts_at, at(24, 10));

    // Stretching into the second shift is a conflict.
    let err = service::update(
        &db,
        &shift.id,
        UpdateShift {
            restaurant: "r1".to_owned(),
            position: None,
            starts_at: None,
            ends_at: Some(at(24, 15)),
        },
    )
    .await
    .expect_err("overlap");
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn delete_is_scoped_to_the_restaurant() {
    let db = test_db().await;
    let shift = service::create(&db, shift_request("alice", 24, 9, 17)).await.expect("create");

    let err = service::delete(&db, &shift.id, "r2").await.expect_err("wrong restaurant");
    assert!(matches!(err, ApiError::NotFound(_)));

    service::delete(&db, &shift.id, "r1").await.expect("delete");
    assert!(matches!(service::get(&db, &shift.id).await, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn clock_punch_flow() {
    let db = test_db().await;
    let shift = service::create(&db, shift_request("alice", 24, 9, 17)).await.expect("create");
    let member = staff("alice");

    let clocked = service::clock_in(&db, &shift.id, &member, at(24, 9)).await.expect("clock in");
    assert_eq!(clocked.clock_in, Some(at(24, 9)));

    let err = service::clock_in(&db, &shift.id, &member, at(24, 10)).await.expect_err("double in");
    assert!(matches!(err, ApiError::Conflict(_)));

    let done = service::clock_out(&db, &shift.id, &member, at(24, 17)).await.expect("clock out");
    assert_eq!(done.clock_out, Some(at(24, 17)));

    let err = service::clock_out(&db, &shift.id, &member, at(24, 18)).await.expect_err("double out");
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn staff_cannot_punch_someone_elses_shift() {
    let db = test_db().await;
    let shift = service::create(&db, shift_request("alice", 24, 9, 17)).await.expect("create");

    let err = service::clock_in(&db, &shift.id, &staff("bob"), at(24, 9))
        .await
        .expect_err("foreign punch");
    assert!(matches!(err, ApiError::Forbidden(_)));

    // Managers may punch on behalf of staff.
    service::clock_in(&db, &shift.id, &manager(), at(24, 9)).await.expect("manager punch");
}

#[tokio::test]
async fn clock_out_requires_clock_in() {
    let db = test_db().await;
    let shift = service::create(&db, shift_request("alice", 24, 9, 17)).await.expect("create");

    let err = service::clock_out(&db, &shift.id, &staff("alice"), at(24, 17))
        .await
        .expect_err("no clock in");
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn worked_minutes_sums_completed_punch_pairs() {
    let db = test_db().await;

    let s1 = service::create(&db, shift_request("alice", 24, 9, 17)).await.expect("s1");
    let s2 = service::create(&db, shift_request("alice", 25, 9, 13)).await.expect("s2");
    let s3 = service::create(&db, shift_request("bob", 24, 9, 17)).await.expect("s3");
    // Unfinished punch pair; must not count.
    service::clock_in(&db, &s3.id, &staff("bob"), at(24, 9)).await.expect("in");

    let alice = staff("alice");
    service::clock_in(&db, &s1.id, &alice, at(24, 9)).await.expect("in");
    service::clock_out(&db, &s1.id, &alice, at(24, 17)).await.expect("out");
    service::clock_in(&db, &s2.id, &alice, at(25, 9)).await.expect("in");
    service::clock_out(&db, &s2.id, &alice, at(25, 12)).await.expect("out");

    let totals = service::worked_minutes(&db, "r1", at(24, 0), at(31, 0)).await.expect("totals");
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].employee, "alice");
    assert_eq!(totals[0].minutes, (8 + 3) * 60);

    let window = service::worked_minutes(&db, "r1", at(25, 0), at(26, 0)).await.expect("window");
    assert_eq!(window[0].minutes, 3 * 60);
}

#[tokio::test]
async fn worked_minutes_is_chronological_even_with_fractional_seconds() {
    let db = test_db().await;
    let shift = service::create(&db, shift_request("alice", 24, 9, 17)).await.expect("create");
    let alice = staff("alice");

    let precise_in = at(24, 9) + Duration::milliseconds(250);
    service::clock_in(&db, &shift.id, &alice, precise_in).await.expect("in");
    service::clock_out(&db, &shift.id, &alice, at(24, 17)).await.expect("out");

    let totals = service::worked_minutes(&db, "r1", at(24, 0), at(25, 0)).await.expect("totals");
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].minutes, 479);
}
