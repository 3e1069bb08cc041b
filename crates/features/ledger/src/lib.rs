//! Ledger feature slice: double-entry bookkeeping for restaurant finances.
//!
//! Owns the chart of accounts, journal entries, the bank feed with its
//! rule-based categorization, pending-outflow reconciliation and P&L
//! reporting. Also runs the `SalesSynced` consumer that turns POS day
//! totals into journal entries.

pub mod entry;
mod handlers;
pub mod models;
pub mod rules;
pub mod sales;
pub mod service;

pub use handlers::router;

use brigade_database::Database;
use brigade_domain::registry::{FeatureSlice, InitializedSlice};
use brigade_events::EventBus;
use brigade_kernel::envelope::ApiError;
use tokio::task::JoinHandle;

/// Ledger feature state: holds the sales-listener task for its lifetime.
#[derive(Debug)]
pub struct Ledger {
    listener: JoinHandle<()>,
}

impl Drop for Ledger {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

impl FeatureSlice for Ledger {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn name(&self) -> &'static str {
        "ledger"
    }
}

/// Initialize the ledger feature and start the sales listener.
///
/// # Errors
/// [`ApiError::Internal`] when the event channel cannot be opened.
pub fn init(db: &Database, events: &EventBus) -> Result<InitializedSlice, ApiError> {
    let listener = sales::spawn_sales_listener(db.clone(), events)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!("Ledger slice initialized");
    Ok(InitializedSlice::new(Ledger { listener }))
}
