//! The ledger side of the POS pipeline: consumes `SalesSynced` events and
//! keeps one `pos-daily` journal entry per restaurant and day.

use crate::models::{CreateJournalEntry, JournalLine, codes};
use crate::service;
use brigade_database::Database;
use brigade_domain::events::SalesSynced;
use brigade_domain::money::Cents;
use brigade_events::EventBus;
use brigade_kernel::envelope::ApiError;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Source tag on automated daily sales entries.
pub const DAILY_SALES_SOURCE: &str = "pos-daily";

/// Builds the balanced lines for one day of sales: cash in, revenue plus
/// tax and tips liabilities out. Returns `None` when there is nothing to
/// post or the split does not add up (bad vendor data).
#[must_use]
pub fn daily_sales_lines(event: &SalesSynced) -> Option<Vec<JournalLine>> {
    if event.gross_cents <= Cents::ZERO {
        return None;
    }

    let net = event.gross_cents - event.tax_cents - event.tip_cents;
    if net < Cents::ZERO || event.tax_cents < Cents::ZERO || event.tip_cents < Cents::ZERO {
        return None;
    }

    let mut lines = vec![JournalLine::debit(codes::CASH, event.gross_cents)];
    if net > Cents::ZERO {
        lines.push(JournalLine::credit(codes::SALES_REVENUE, net));
    }
    if event.tax_cents > Cents::ZERO {
        lines.push(JournalLine::credit(codes::SALES_TAX_PAYABLE, event.tax_cents));
    }
    if event.tip_cents > Cents::ZERO {
        lines.push(JournalLine::credit(codes::TIPS_PAYABLE, event.tip_cents));
    }

    (lines.len() >= 2).then_some(lines)
}

/// Reposts the daily sales entry for the event's restaurant and date.
/// Webhook replays arrive as fresh events with recomputed day totals, so
/// the previous `pos-daily` entry is unposted first.
///
/// # Errors
/// Database failures from the unpost or the posting itself.
pub async fn post_daily_sales(db: &Database, event: &SalesSynced) -> Result<(), ApiError> {
    service::ensure_default_accounts(db, &event.restaurant).await?;

    if let Some(previous) =
        service::entry_for_source(db, &event.restaurant, DAILY_SALES_SOURCE, event.date).await?
    {
        debug!(restaurant = %event.restaurant, date = %event.date, entry = %previous.id,
            "Superseding previous daily sales entry");
        service::unpost_entry(db, &previous).await?;
    }

    let Some(lines) = daily_sales_lines(event) else {
        debug!(restaurant = %event.restaurant, date = %event.date, "No postable sales for day");
        return Ok(());
    };

    let entry = service::post_entry(
        db,
        CreateJournalEntry {
            restaurant: event.restaurant.clone(),
            entry_date: event.date,
            memo: format!("POS daily sales ({} orders)", event.orders),
            lines,
        },
        Some(DAILY_SALES_SOURCE),
    )
    .await?;

    info!(restaurant = %event.restaurant, date = %event.date, entry = %entry.id,
        gross = %event.gross_cents, "Posted daily sales entry");
    Ok(())
}

/// Spawns the long-lived `SalesSynced` consumer task.
///
/// # Errors
/// [`brigade_events::EventBusError`] when the channel cannot be opened.
pub fn spawn_sales_listener(
    db: Database,
    events: &EventBus,
) -> Result<JoinHandle<()>, brigade_events::EventBusError> {
    let mut rx = events.subscribe::<SalesSynced>()?;

    Ok(tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(error) = post_daily_sales(&db, &event).await {
                        warn!(restaurant = %event.restaurant, date = %event.date, %error,
                            "Daily sales posting failed");
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Sales listener lagged; day totals will self-heal on next sync");
                },
                Err(RecvError::Closed) => {
                    info!("Sales listener shutting down");
                    break;
                },
            }
        }
    }))
}
