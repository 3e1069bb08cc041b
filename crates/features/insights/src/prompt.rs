//! P&L digest prompt assembly.

use brigade_ledger::models::PnlReport;
use std::fmt::Write;

/// How many accounts the prompt lists per side; the rest fold into the
/// totals, keeping the prompt compact for small context windows.
const MAX_ROWS: usize = 10;

/// Renders a P&L report as a compact plain-text prompt asking the model for
/// a short operational digest.
#[must_use]
pub fn pnl_prompt(report: &PnlReport) -> String {
    let mut prompt = format!(
        "You are an accountant for a restaurant. Summarize this profit & loss statement \
         in 3 short paragraphs for the owner: what drove revenue, what drove costs, and \
         one concrete suggestion.\n\n\
         Period: {} to {}\nRevenue: {}\nExpenses: {}\nNet: {}\n",
        report.from, report.to, report.revenue_cents, report.expense_cents, report.net_cents
    );

    if !report.rows.is_empty() {
        prompt.push_str("\nBy account:\n");
        for row in report.rows.iter().take(MAX_ROWS) {
            let _ = writeln!(
                prompt,
                "  {} {} ({:?}): {}",
                row.account_code, row.account_name, row.kind, row.amount_cents
            );
        }
        if report.rows.len() > MAX_ROWS {
            let _ = writeln!(prompt, "  ... and {} more accounts", report.rows.len() - MAX_ROWS);
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use brigade_domain::money::Cents;
    use brigade_ledger::models::{AccountKind, PnlRow};
    use chrono::NaiveDate;

    fn report(rows: Vec<PnlRow>) -> PnlReport {
        PnlReport {
            restaurant: "r1".to_owned(),
            from: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            revenue_cents: Cents(250_000),
            expense_cents: Cents(180_000),
            net_cents: Cents(70_000),
            rows,
        }
    }

    #[test]
    fn prompt_carries_totals_and_period() {
        let prompt = pnl_prompt(&report(vec![]));
        assert!(prompt.contains("2026-08-01 to 2026-08-31"));
        assert!(prompt.contains("Revenue: $2500.00"));
        assert!(prompt.contains("Net: $700.00"));
        assert!(!prompt.contains("By account"));
    }

    #[test]
    fn long_reports_are_truncated() {
        let rows = (0..15)
            .map(|i| PnlRow {
                account_code: format!("5{i:03}"),
                account_name: format!("Expense {i}"),
                kind: AccountKind::Expense,
                amount_cents: Cents(1000),
            })
            .collect();

        let prompt = pnl_prompt(&report(rows));
        assert!(prompt.contains("5009"));
        assert!(!prompt.contains("5010"));
        assert!(prompt.contains("... and 5 more accounts"));
    }
}
