use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// A scheduled shift, with actual clock punches once they happen.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub restaurant: String,
    /// User record key of the assigned employee.
    pub employee: String,
    pub position: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShift {
    pub restaurant: String,
    pub employee: String,
    pub position: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShift {
    pub restaurant: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct WeekQuery {
    pub restaurant: String,
    /// Any date inside the requested week.
    pub week: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantQuery {
    pub restaurant: String,
}

/// Body for the clock punch endpoints.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockRequest {
    pub restaurant: String,
}

/// Minutes actually worked by one employee over a period, from clock punches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeMinutes {
    pub employee: String,
    pub minutes: i64,
}

/// Monday-to-Monday bounds of the week containing `date`, in UTC.
#[must_use]
pub fn week_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    let start = monday.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(7))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_bounds_snap_to_monday() {
        // 2026-08-29 is a Saturday.
        let (start, end) = week_bounds(NaiveDate::from_ymd_opt(2026, 8, 29).unwrap());
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2026, 8, 24).unwrap());
        assert_eq!(end - start, Duration::days(7));
    }

    #[test]
    fn monday_is_its_own_week_start() {
        let monday = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let (start, _) = week_bounds(monday);
        assert_eq!(start.date_naive(), monday);
    }
}
