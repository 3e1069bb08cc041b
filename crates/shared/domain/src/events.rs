//! Cross-slice event payloads carried on the event bus.

use crate::money::Cents;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Published after a POS webhook lands and the day's unified sales have been
/// re-aggregated. Carries the full day totals so consumers can repost the
/// matching journal entry without reading the sales tables themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSynced {
    pub restaurant: String,
    pub date: NaiveDate,
    pub orders: u32,
    pub gross_cents: Cents,
    pub tax_cents: Cents,
    pub tip_cents: Cents,
}
