//! Unified-sale persistence and daily aggregation.

use crate::models::{DailySales, NormalizedOrder, UnifiedSale};
use brigade_database::Database;
use brigade_domain::events::SalesSynced;
use brigade_domain::money::Cents;
use brigade_events::EventBus;
use brigade_kernel::envelope::ApiError;
use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::debug;

const SALE_FIELDS: &str = "record::id(id) AS id, restaurant, vendor, external_id, closed_at, \
                           gross_cents, tax_cents, tip_cents, discount_cents, tender";

/// Upserts one normalized order, keyed by `(vendor, external_id)` so a
/// replayed webhook overwrites rather than duplicates.
///
/// # Errors
/// Database failures only.
pub async fn upsert_sale(
    db: &Database,
    restaurant: &str,
    order: &NormalizedOrder,
) -> Result<(), ApiError> {
    let key = format!("{}-{}", order.vendor, order.external_id);

    db.query(
        "UPSERT type::thing('unified_sale', $key) SET restaurant = $restaurant, \
         vendor = $vendor, external_id = $external_id, closed_at = $closed_at, \
         gross_cents = $gross_cents, tax_cents = $tax_cents, tip_cents = $tip_cents, \
         discount_cents = $discount_cents, tender = $tender",
    )
    .bind(("key", key))
    .bind(("restaurant", restaurant.to_owned()))
    .bind(("vendor", order.vendor))
    .bind(("external_id", order.external_id.clone()))
    .bind(("closed_at", order.closed_at))
    .bind(("gross_cents", order.gross_cents))
    .bind(("tax_cents", order.tax_cents))
    .bind(("tip_cents", order.tip_cents))
    .bind(("discount_cents", order.discount_cents))
    .bind(("tender", order.tender.clone()))
    .await?
    .check()?;

    Ok(())
}

/// Aggregates unified sales for one restaurant and calendar day (UTC).
///
/// # Errors
/// Database failures only.
pub async fn daily_sales(
    db: &Database,
    restaurant: &str,
    date: NaiveDate,
) -> Result<DailySales, ApiError> {
    let from = date.and_time(NaiveTime::MIN).and_utc();
    let to = from + Duration::days(1);

    let sales: Vec<UnifiedSale> = db
        .query(format!(
            "SELECT {SALE_FIELDS} FROM unified_sale \
             WHERE restaurant = $restaurant AND closed_at >= $from AND closed_at < $to"
        ))
        .bind(("restaurant", restaurant.to_owned()))
        .bind(("from", from))
        .bind(("to", to))
        .await?
        .take(0)?;

    let mut summary = DailySales {
        restaurant: restaurant.to_owned(),
        date,
        orders: 0,
        gross_cents: Cents::ZERO,
        tax_cents: Cents::ZERO,
        tip_cents: Cents::ZERO,
        discount_cents: Cents::ZERO,
    };
    for sale in sales {
        summary.orders += 1;
        summary.gross_cents = summary.gross_cents.saturating_add(sale.gross_cents);
        summary.tax_cents = summary.tax_cents.saturating_add(sale.tax_cents);
        summary.tip_cents = summary.tip_cents.saturating_add(sale.tip_cents);
        summary.discount_cents = summary.discount_cents.saturating_add(sale.discount_cents);
    }

    Ok(summary)
}

/// The full webhook pipeline after normalization: upsert, re-aggregate the
/// order's day and publish [`SalesSynced`] with the fresh totals.
///
/// # Errors
/// Database failures, or an internal error when the event bus misbehaves.
pub async fn ingest(
    db: &Database,
    events: &EventBus,
    restaurant: &str,
    order: &NormalizedOrder,
) -> Result<DailySales, ApiError> {
    upsert_sale(db, restaurant, order).await?;

    let date = order.closed_at.date_naive();
    let summary = daily_sales(db, restaurant, date).await?;

    let receivers = events
        .publish(SalesSynced {
            restaurant: restaurant.to_owned(),
            date,
            orders: summary.orders,
            gross_cents: summary.gross_cents,
            tax_cents: summary.tax_cents,
            tip_cents: summary.tip_cents,
        })
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    debug!(%restaurant, %date, vendor = %order.vendor, external_id = %order.external_id,
        receivers, "Sale ingested");

    Ok(summary)
}
