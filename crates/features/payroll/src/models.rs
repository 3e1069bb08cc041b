use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// One employee's worked time within a pay period, split at the weekly
/// overtime threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetLine {
    pub employee: String,
    pub regular_minutes: i64,
    pub overtime_minutes: i64,
}

/// A weekly pay period (Monday through Sunday) with its timesheet lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayPeriod {
    pub restaurant: String,
    pub period_start: NaiveDate,
    /// Exclusive; the Monday of the following week.
    pub period_end: NaiveDate,
    pub lines: Vec<TimesheetLine>,
}

/// Outcome of a payroll export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub employees: usize,
    /// Identifier returned by the payroll provider, when it supplies one.
    pub payroll_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub restaurant: String,
    /// Any date inside the wanted week; defaults to today.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub restaurant: String,
    /// Any date inside the week to export; defaults to today.
    pub date: Option<NaiveDate>,
}
