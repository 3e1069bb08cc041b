//! Shift persistence and the rules around it: window validation, overlap
//! rejection, clock punches and worked-time aggregation.

use crate::models::{CreateShift, EmployeeMinutes, Shift, UpdateShift, week_bounds};
use brigade_database::Database;
use brigade_domain::role::Role;
use brigade_identity::Member;
use brigade_kernel::envelope::ApiError;
use brigade_kernel::safe_nanoid;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::json;
use std::collections::BTreeMap;

const SHIFT_FIELDS: &str = "record::id(id) AS id, restaurant, employee, position, \
                            starts_at, ends_at, clock_in, clock_out";

/// Longest shift we accept; anything above is almost certainly a typo.
const MAX_SHIFT_HOURS: i64 = 16;

fn validate_window(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Result<(), ApiError> {
    if starts_at >= ends_at {
        return Err(ApiError::Validation("shift must end after it starts".to_owned()));
    }
    if ends_at - starts_at > Duration::hours(MAX_SHIFT_HOURS) {
        return Err(ApiError::Validation(format!("shift exceeds {MAX_SHIFT_HOURS} hours")));
    }
    Ok(())
}

async fn ensure_no_overlap(
    db: &Database,
    restaurant: &str,
    employee: &str,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    exclude: Option<String>,
) -> Result<(), ApiError> {
    let conflicts: Vec<String> = db
        .query(
            "SELECT VALUE record::id(id) FROM shift \
             WHERE restaurant = $restaurant AND employee = $employee \
               AND starts_at < $ends_at AND ends_at > $starts_at \
               AND ($exclude = NONE OR record::id(id) != $exclude)",
        )
        .bind(("restaurant", restaurant.to_owned()))
        .bind(("employee", employee.to_owned()))
        .bind(("starts_at", starts_at))
        .bind(("ends_at", ends_at))
        .bind(("exclude", exclude))
        .await?
        .take(0)?;

    if let Some(conflict) = conflicts.first() {
        return Err(ApiError::Conflict(format!(
            "overlaps existing shift shift:{conflict} for {employee}"
        )));
    }

    Ok(())
}

/// Loads one shift by record key.
///
/// # Errors
/// [`ApiError::NotFound`] when the record does not exist.
pub async fn get(db: &Database, key: &str) -> Result<Shift, ApiError> {
    let shift: Option<Shift> = db
        .query(format!("SELECT {SHIFT_FIELDS} FROM ONLY type::thing('shift', $key)"))
        .bind(("key", key.to_owned()))
        .await?
        .take(0)?;

    shift.ok_or_else(|| ApiError::NotFound(format!("shift:{key}")))
}

/// Creates a shift after window and overlap validation.
///
/// # Errors
/// [`ApiError::Validation`] for a bad time window, [`ApiError::Conflict`]
/// when it overlaps another shift of the same employee.
pub async fn create(db: &Database, req: CreateShift) -> Result<Shift, ApiError> {
    validate_window(req.starts_at, req.ends_at)?;
    ensure_no_overlap(db, &req.restaurant, &req.employee, req.starts_at, req.ends_at, None)
        .await?;

    let id = safe_nanoid!();
    db.query(
        "CREATE type::thing('shift', $id) SET restaurant = $restaurant, employee = $employee, \
         position = $position, starts_at = $starts_at, ends_at = $ends_at, \
         clock_in = NONE, clock_out = NONE",
    )
    .bind(("id", id.clone()))
    .bind(("restaurant", req.restaurant.clone()))
    .bind(("employee", req.employee.clone()))
    .bind(("position", req.position.clone()))
    .bind(("starts_at", req.starts_at))
    .bind(("ends_at", req.ends_at))
    .await?
    .check()?;

    Ok(Shift {
        id,
        restaurant: req.restaurant,
        employee: req.employee,
        position: req.position,
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        clock_in: None,
        clock_out: None,
    })
}

/// All shifts of the week containing `date`, ordered by start time.
///
/// # Errors
/// Database failures only.
pub async fn week(db: &Database, restaurant: &str, date: NaiveDate) -> Result<Vec<Shift>, ApiError> {
    let (from, to) = week_bounds(date);

    let shifts: Vec<Shift> = db
        .query(format!(
            "SELECT {SHIFT_FIELDS} FROM shift \
             WHERE restaurant = $restaurant AND starts_at >= $from AND starts_at < $to \
             ORDER BY starts_at"
        ))
        .bind(("restaurant", restaurant.to_owned()))
        .bind(("from", from))
        .bind(("to", to))
        .await?
        .take(0)?;

    Ok(shifts)
}

/// Applies a partial update, re-running window and overlap validation
/// against the merged result.
///
/// # Errors
/// [`ApiError::NotFound`] when the shift is missing or belongs to another
/// restaurant; validation and conflict errors as in [`create`].
pub async fn update(db: &Database, key: &str, req: UpdateShift) -> Result<Shift, ApiError> {
    let existing = get(db, key).await?;
    if existing.restaurant != req.restaurant {
        return Err(ApiError::NotFound(format!("shift:{key}")));
    }

    let starts_at = req.starts_at.unwrap_or(existing.starts_at);
    let ends_at = req.ends_at.unwrap_or(existing.ends_at);
    validate_window(starts_at, ends_at)?;
    ensure_no_overlap(
        db,
        &existing.restaurant,
        &existing.employee,
        starts_at,
        ends_at,
        Some(key.to_owned()),
    )
    .await?;

    let mut patch = json!({ "starts_at": starts_at, "ends_at": ends_at });
    if let Some(position) = &req.position {
        patch["position"] = json!(position);
    }

    db.query("UPDATE type::thing('shift', $key) MERGE $patch")
        .bind(("key", key.to_owned()))
        .bind(("patch", patch))
        .await?
        .check()?;

    get(db, key).await
}

/// Deletes a shift.
///
/// # Errors
/// [`ApiError::NotFound`] when the shift is missing or belongs to another
/// restaurant.
pub async fn delete(db: &Database, key: &str, restaurant: &str) -> Result<(), ApiError> {
    let existing = get(db, key).await?;
    if existing.restaurant != restaurant {
        return Err(ApiError::NotFound(format!("shift:{key}")));
    }

    db.query("DELETE type::thing('shift', $key)")
        .bind(("key", key.to_owned()))
        .await?
        .check()?;

    Ok(())
}

fn authorize_punch(shift: &Shift, member: &Member) -> Result<(), ApiError> {
    if shift.restaurant != member.restaurant {
        return Err(ApiError::NotFound(format!("shift for {}", member.restaurant)));
    }
    // Staff punch their own shifts; managers may punch anyone's.
    if shift.employee != member.user && !member.role.grants(Role::Manager) {
        return Err(ApiError::Forbidden("cannot punch another employee's shift".to_owned()));
    }
    Ok(())
}

/// Records the clock-in punch.
///
/// # Errors
/// [`ApiError::Conflict`] when the shift is already clocked in.
pub async fn clock_in(
    db: &Database,
    key: &str,
    member: &Member,
    now: DateTime<Utc>,
) -> Result<Shift, ApiError> {
    let shift = get(db, key).await?;
    authorize_punch(&shift, member)?;

    if shift.clock_in.is_some() {
        return Err(ApiError::Conflict("shift is already clocked in".to_owned()));
    }

    db.query("UPDATE type::thing('shift', $key) SET clock_in = $now")
        .bind(("key", key.to_owned()))
        .bind(("now", now))
        .await?
        .check()?;

    Ok(Shift { clock_in: Some(now), ..shift })
}

/// Records the clock-out punch.
///
/// # Errors
/// [`ApiError::Validation`] without a prior clock-in, [`ApiError::Conflict`]
/// when already clocked out.
pub async fn clock_out(
    db: &Database,
    key: &str,
    member: &Member,
    now: DateTime<Utc>,
) -> Result<Shift, ApiError> {
    let shift = get(db, key).await?;
    authorize_punch(&shift, member)?;

    let Some(clock_in) = shift.clock_in else {
        return Err(ApiError::Validation("shift was never clocked in".to_owned()));
    };
    if shift.clock_out.is_some() {
        return Err(ApiError::Conflict("shift is already clocked out".to_owned()));
    }
    if now <= clock_in {
        return Err(ApiError::Validation("clock-out must come after clock-in".to_owned()));
    }

    db.query("UPDATE type::thing('shift', $key) SET clock_out = $now")
        .bind(("key", key.to_owned()))
        .bind(("now", now))
        .await?
        .check()?;

    Ok(Shift { clock_out: Some(now), ..shift })
}

/// Minutes worked per employee over `[from, to)`, from completed punch pairs.
/// Shifts without both punches do not count.
///
/// # Errors
/// Database failures only.
pub async fn worked_minutes(
    db: &Database,
    restaurant: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<EmployeeMinutes>, ApiError> {
    let shifts: Vec<Shift> = db
        .query(format!(
            "SELECT {SHIFT_FIELDS} FROM shift \
             WHERE restaurant = $restaurant AND clock_in >= $from AND clock_in < $to \
               AND clock_in != NONE AND clock_out != NONE"
        ))
        .bind(("restaurant", restaurant.to_owned()))
        .bind(("from", from))
        .bind(("to", to))
        .await?
        .take(0)?;

    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for shift in shifts {
        if let (Some(clock_in), Some(clock_out)) = (shift.clock_in, shift.clock_out) {
            *totals.entry(shift.employee).or_default() += (clock_out - clock_in).num_minutes();
        }
    }

    Ok(totals.into_iter().map(|(employee, minutes)| EmployeeMinutes { employee, minutes }).collect())
}
