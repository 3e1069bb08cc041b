//! Vendor payload normalization.
//!
//! Each vendor reports the same facts in a different shape and unit: Square
//! nests integer cents under `*_money` objects, Toast reports dollars as
//! floats, Clover uses flat integer cents plus an epoch-millis timestamp.
//! Everything funnels into [`NormalizedOrder`].

use crate::models::NormalizedOrder;
use brigade_domain::money::Cents;
use brigade_domain::vendor::PosVendor;
use brigade_kernel::envelope::ApiError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

fn dollars_to_cents(dollars: f64) -> Cents {
    #[allow(clippy::cast_possible_truncation)]
    Cents((dollars * 100.0).round() as i64)
}

fn decode<T: for<'de> Deserialize<'de>>(vendor: PosVendor, payload: &Value) -> Result<T, ApiError> {
    serde_json::from_value(payload.clone())
        .map_err(|e| ApiError::Validation(format!("malformed {vendor} payload: {e}")))
}

/// Dispatches to the vendor-specific parser.
///
/// # Errors
/// [`ApiError::Validation`] when the payload does not match the vendor's
/// documented shape.
pub fn normalize(vendor: PosVendor, payload: &Value) -> Result<NormalizedOrder, ApiError> {
    match vendor {
        PosVendor::Square => normalize_square(payload),
        PosVendor::Toast => normalize_toast(payload),
        PosVendor::Clover => normalize_clover(payload),
    }
}

// --- Square: `payment.updated` events ---

#[derive(Debug, Deserialize)]
struct SquareEnvelope {
    data: SquareData,
}

#[derive(Debug, Deserialize)]
struct SquareData {
    object: SquareObject,
}

#[derive(Debug, Deserialize)]
struct SquareObject {
    payment: SquarePayment,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct SquarePayment {
    id: String,
    created_at: DateTime<Utc>,
    total_money: SquareMoney,
    #[serde(default)]
    tax_money: Option<SquareMoney>,
    #[serde(default)]
    tip_money: Option<SquareMoney>,
    #[serde(default)]
    source_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SquareMoney {
    amount: i64,
}

fn normalize_square(payload: &Value) -> Result<NormalizedOrder, ApiError> {
    let envelope: SquareEnvelope = decode(PosVendor::Square, payload)?;
    let payment = envelope.data.object.payment;

    Ok(NormalizedOrder {
        vendor: PosVendor::Square,
        external_id: payment.id,
        closed_at: payment.created_at,
        gross_cents: Cents(payment.total_money.amount),
        tax_cents: Cents(payment.tax_money.unwrap_or_default().amount),
        tip_cents: Cents(payment.tip_money.unwrap_or_default().amount),
        discount_cents: Cents::ZERO,
        tender: payment.source_type.unwrap_or_else(|| "UNKNOWN".to_owned()),
    })
}

// --- Toast: order objects, dollar floats ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToastOrder {
    guid: String,
    closed_date: DateTime<Utc>,
    total_amount: f64,
    #[serde(default)]
    tax_amount: f64,
    #[serde(default)]
    tip_amount: f64,
    #[serde(default)]
    discount_amount: f64,
}

fn normalize_toast(payload: &Value) -> Result<NormalizedOrder, ApiError> {
    let order: ToastOrder = decode(PosVendor::Toast, payload)?;

    Ok(NormalizedOrder {
        vendor: PosVendor::Toast,
        external_id: order.guid,
        closed_at: order.closed_date,
        gross_cents: dollars_to_cents(order.total_amount),
        tax_cents: dollars_to_cents(order.tax_amount),
        tip_cents: dollars_to_cents(order.tip_amount),
        discount_cents: dollars_to_cents(order.discount_amount),
        tender: "TOAST".to_owned(),
    })
}

// --- Clover: payment objects, flat cents, epoch millis ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloverPayment {
    id: String,
    /// Amount charged excluding tip, in cents.
    amount: i64,
    #[serde(default)]
    tax_amount: i64,
    #[serde(default)]
    tip_amount: i64,
    /// Epoch milliseconds.
    created_time: i64,
    #[serde(default)]
    tender: Option<CloverTender>,
}

#[derive(Debug, Deserialize)]
struct CloverTender {
    label: String,
}

fn normalize_clover(payload: &Value) -> Result<NormalizedOrder, ApiError> {
    let payment: CloverPayment = decode(PosVendor::Clover, payload)?;

    let closed_at = DateTime::<Utc>::from_timestamp_millis(payment.created_time)
        .ok_or_else(|| ApiError::Validation("clover createdTime out of range".to_owned()))?;

    Ok(NormalizedOrder {
        vendor: PosVendor::Clover,
        external_id: payment.id,
        closed_at,
        gross_cents: Cents(payment.amount + payment.tip_amount),
        tax_cents: Cents(payment.tax_amount),
        tip_cents: Cents(payment.tip_amount),
        discount_cents: Cents::ZERO,
        tender: payment.tender.map_or_else(|| "UNKNOWN".to_owned(), |t| t.label),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn square_payment_updated() {
        let payload = json!({
            "type": "payment.updated",
            "data": { "object": { "payment": {
                "id": "pay_abc",
                "created_at": "2026-08-24T18:30:00Z",
                "total_money": { "amount": 1280, "currency": "USD" },
                "tax_money": { "amount": 80 },
                "tip_money": { "amount": 200 },
                "source_type": "CARD"
            }}}
        });

        let order = normalize(PosVendor::Square, &payload).expect("normalize");
        assert_eq!(order.external_id, "pay_abc");
        assert_eq!(order.gross_cents, Cents(1280));
        assert_eq!(order.tax_cents, Cents(80));
        assert_eq!(order.tip_cents, Cents(200));
        assert_eq!(order.tender, "CARD");
    }

    #[test]
    fn square_missing_optional_money_defaults_to_zero() {
        let payload = json!({
            "data": { "object": { "payment": {
                "id": "pay_min",
                "created_at": "2026-08-24T18:30:00Z",
                "total_money": { "amount": 500 }
            }}}
        });

        let order = normalize(PosVendor::Square, &payload).expect("normalize");
        assert_eq!(order.tax_cents, Cents::ZERO);
        assert_eq!(order.tip_cents, Cents::ZERO);
        assert_eq!(order.tender, "UNKNOWN");
    }

    #[test]
    fn toast_dollars_round_to_cents() {
        let payload = json!({
            "guid": "ord-9",
            "closedDate": "2026-08-24T21:15:00Z",
            "totalAmount": 64.30,
            "taxAmount": 4.57,
            "tipAmount": 10.00,
            "discountAmount": 2.50
        });

        let order = normalize(PosVendor::Toast, &payload).expect("normalize");
        assert_eq!(order.gross_cents, Cents(6430));
        assert_eq!(order.tax_cents, Cents(457));
        assert_eq!(order.tip_cents, Cents(1000));
        assert_eq!(order.discount_cents, Cents(250));
    }

    #[test]
    fn clover_epoch_millis_and_tip_inclusive_gross() {
        let payload = json!({
            "id": "clv-7",
            "amount": 2000,
            "taxAmount": 150,
            "tipAmount": 400,
            "createdTime": 1_787_000_000_000_i64,
            "tender": { "label": "Credit Card" }
        });

        let order = normalize(PosVendor::Clover, &payload).expect("normalize");
        assert_eq!(order.gross_cents, Cents(2400));
        assert_eq!(order.tip_cents, Cents(400));
        assert_eq!(order.tender, "Credit Card");
        assert_eq!(order.closed_at.timestamp_millis(), 1_787_000_000_000);
    }

    #[test]
    fn malformed_payload_is_a_validation_error() {
        let err = normalize(PosVendor::Square, &json!({ "nope": true })).expect_err("bad shape");
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
