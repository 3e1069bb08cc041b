use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// A stored AI digest of one restaurant's P&L period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub restaurant: String,
    pub period_from: NaiveDate,
    pub period_to: NaiveDate,
    pub body: String,
    /// The model that produced the digest.
    pub model: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub restaurant: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantQuery {
    pub restaurant: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub restaurant: String,
    /// Recipient address.
    pub to: String,
    /// Insight to send; defaults to the newest one.
    pub insight: Option<String>,
}

/// Acknowledgement for a dispatched email.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailReport {
    pub insight: String,
    pub to: String,
}
