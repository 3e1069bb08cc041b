use brigade_domain::money::Cents;
use brigade_domain::vendor::PosVendor;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// One vendor order/payment reduced to the shape every vendor shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOrder {
    pub vendor: PosVendor,
    /// The vendor's own identifier; the idempotency key together with
    /// `vendor`.
    pub external_id: String,
    pub closed_at: DateTime<Utc>,
    /// Total collected, tax and tip included.
    pub gross_cents: Cents,
    pub tax_cents: Cents,
    pub tip_cents: Cents,
    pub discount_cents: Cents,
    /// Payment method label as the vendor reports it.
    pub tender: String,
}

/// A row of the denormalized `unified_sale` table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedSale {
    pub id: String,
    pub restaurant: String,
    #[schema(value_type = String)]
    pub vendor: PosVendor,
    pub external_id: String,
    pub closed_at: DateTime<Utc>,
    #[schema(value_type = i64)]
    pub gross_cents: Cents,
    #[schema(value_type = i64)]
    pub tax_cents: Cents,
    #[schema(value_type = i64)]
    pub tip_cents: Cents,
    #[schema(value_type = i64)]
    pub discount_cents: Cents,
    pub tender: String,
}

/// Aggregated sales for one restaurant and calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub restaurant: String,
    pub date: NaiveDate,
    pub orders: u32,
    #[schema(value_type = i64)]
    pub gross_cents: Cents,
    #[schema(value_type = i64)]
    pub tax_cents: Cents,
    #[schema(value_type = i64)]
    pub tip_cents: Cents,
    #[schema(value_type = i64)]
    pub discount_cents: Cents,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DailyQuery {
    pub restaurant: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct WebhookQuery {
    pub restaurant: String,
}

/// Acknowledgement body returned to the vendor.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub received: String,
}
