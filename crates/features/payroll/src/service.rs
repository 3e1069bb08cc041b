//! Pay-period assembly and Gusto export.

use crate::GustoClient;
use crate::models::{ExportReport, PayPeriod, TimesheetLine};
use brigade_database::Database;
use brigade_kernel::envelope::ApiError;
use brigade_scheduling::models::week_bounds;
use brigade_scheduling::service::worked_minutes;
use chrono::NaiveDate;
use serde_json::{Value, json};
use tracing::info;

/// Forty hours; weekly minutes beyond this count as overtime.
pub const WEEKLY_REGULAR_MINUTES: i64 = 2400;

/// Splits a week's worked minutes into (regular, overtime).
#[must_use]
pub fn split_overtime(minutes: i64) -> (i64, i64) {
    if minutes > WEEKLY_REGULAR_MINUTES {
        (WEEKLY_REGULAR_MINUTES, minutes - WEEKLY_REGULAR_MINUTES)
    } else {
        (minutes.max(0), 0)
    }
}

/// Assembles the pay period for the week containing `date` from completed
/// clock punches.
///
/// # Errors
/// Database failures only.
pub async fn current_period(
    db: &Database,
    restaurant: &str,
    date: NaiveDate,
) -> Result<PayPeriod, ApiError> {
    let (from, to) = week_bounds(date);
    let worked = worked_minutes(db, restaurant, from, to).await?;

    let lines = worked
        .into_iter()
        .map(|w| {
            let (regular_minutes, overtime_minutes) = split_overtime(w.minutes);
            TimesheetLine { employee: w.employee, regular_minutes, overtime_minutes }
        })
        .collect();

    Ok(PayPeriod {
        restaurant: restaurant.to_owned(),
        period_start: from.date_naive(),
        period_end: to.date_naive(),
        lines,
    })
}

/// Upserts one timesheet row per employee, keyed by restaurant, period and
/// employee so repeated exports overwrite their own rows.
///
/// # Errors
/// Database failures only.
pub async fn persist_timesheets(db: &Database, period: &PayPeriod) -> Result<(), ApiError> {
    for line in &period.lines {
        let key = format!("{}-{}-{}", period.restaurant, period.period_start, line.employee);
        db.query(
            "UPSERT type::thing('timesheet', $key) SET restaurant = $restaurant, \
             period_start = $period_start, period_end = $period_end, employee = $employee, \
             regular_minutes = $regular_minutes, overtime_minutes = $overtime_minutes",
        )
        .bind(("key", key))
        .bind(("restaurant", period.restaurant.clone()))
        .bind(("period_start", period.period_start))
        .bind(("period_end", period.period_end))
        .bind(("employee", line.employee.clone()))
        .bind(("regular_minutes", line.regular_minutes))
        .bind(("overtime_minutes", line.overtime_minutes))
        .await?
        .check()?;
    }

    Ok(())
}

/// Exports the pay period for the week containing `date`: persists the
/// timesheet rows, then submits the payroll to Gusto.
///
/// # Errors
/// [`ApiError::Validation`] when the period has no completed punches,
/// [`ApiError::Vendor`] when Gusto is unconfigured or rejects the payroll.
pub async fn export(
    db: &Database,
    gusto: Option<&GustoClient>,
    restaurant: &str,
    date: NaiveDate,
) -> Result<ExportReport, ApiError> {
    let period = current_period(db, restaurant, date).await?;
    if period.lines.is_empty() {
        return Err(ApiError::Validation(format!(
            "no completed punches for {restaurant} in the week of {}",
            period.period_start
        )));
    }

    persist_timesheets(db, &period).await?;

    let gusto = gusto.ok_or_else(|| {
        brigade_connect::ConnectError::InvalidConfiguration("gusto is not configured".to_owned())
    })?;

    let body = json!({
        "payroll": {
            "start_date": period.period_start,
            "end_date": period.period_end,
            "employee_compensations": period.lines.iter().map(|line| json!({
                "employee": line.employee,
                "regular_minutes": line.regular_minutes,
                "overtime_minutes": line.overtime_minutes,
            })).collect::<Vec<_>>(),
        }
    });

    let response: Value = gusto
        .client
        .post_json(&format!("companies/{}/payrolls", gusto.company_id), &body)
        .await?;

    let payroll_id = response
        .get("payroll_uuid")
        .or_else(|| response.get("uuid"))
        .and_then(Value::as_str)
        .map(str::to_owned);

    info!(%restaurant, period_start = %period.period_start, employees = period.lines.len(),
        ?payroll_id, "Payroll exported");

    Ok(ExportReport {
        period_start: period.period_start,
        period_end: period.period_end,
        employees: period.lines.len(),
        payroll_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_forty_hours_is_all_regular() {
        assert_eq!(split_overtime(0), (0, 0));
        assert_eq!(split_overtime(1800), (1800, 0));
        assert_eq!(split_overtime(2400), (2400, 0));
    }

    #[test]
    fn minutes_past_forty_hours_are_overtime() {
        assert_eq!(split_overtime(2401), (2400, 1));
        assert_eq!(split_overtime(3000), (2400, 600));
    }

    #[test]
    fn negative_totals_clamp_to_zero() {
        assert_eq!(split_overtime(-5), (0, 0));
    }
}
