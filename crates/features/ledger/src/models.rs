use brigade_domain::money::Cents;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Well-known account codes the automated flows post against. They are part
/// of the default chart every restaurant gets seeded with.
pub mod codes {
    pub const CASH: &str = "1000";
    pub const SALES_TAX_PAYABLE: &str = "2100";
    pub const TIPS_PAYABLE: &str = "2150";
    pub const SALES_REVENUE: &str = "4000";
}

/// The five fundamental account kinds of double-entry bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub restaurant: String,
    /// Short numeric code, unique per restaurant (e.g. "1000" for cash).
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
    /// Signed running balance; debits add, credits subtract.
    #[schema(value_type = i64)]
    pub balance_cents: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccount {
    pub restaurant: String,
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
}

/// One side-tagged amount within a journal entry. Exactly one of the two
/// amounts is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalLine {
    pub account_code: String,
    #[serde(default)]
    #[schema(value_type = i64)]
    pub debit_cents: Cents,
    #[serde(default)]
    #[schema(value_type = i64)]
    pub credit_cents: Cents,
}

impl JournalLine {
    #[must_use]
    pub fn debit(account_code: &str, amount: Cents) -> Self {
        Self { account_code: account_code.to_owned(), debit_cents: amount, credit_cents: Cents::ZERO }
    }

    #[must_use]
    pub fn credit(account_code: &str, amount: Cents) -> Self {
        Self { account_code: account_code.to_owned(), debit_cents: Cents::ZERO, credit_cents: amount }
    }

    /// Signed balance impact of this line (debits add, credits subtract).
    #[must_use]
    pub fn delta(&self) -> Cents {
        self.debit_cents - self.credit_cents
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub restaurant: String,
    pub entry_date: NaiveDate,
    pub memo: String,
    /// Flow that produced this entry ("bank", "pos-daily"); absent for
    /// manually posted entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub lines: Vec<JournalLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJournalEntry {
    pub restaurant: String,
    pub entry_date: NaiveDate,
    pub memo: String,
    pub lines: Vec<JournalLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BankTxStatus {
    Unreviewed,
    Categorized,
    Reconciled,
}

/// A bank feed row. Negative amounts are outflows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankTransaction {
    pub id: String,
    pub restaurant: String,
    pub posted_at: NaiveDate,
    #[schema(value_type = i64)]
    pub amount_cents: Cents,
    pub description: String,
    pub status: BankTxStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_entry: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportTransaction {
    pub posted_at: NaiveDate,
    #[schema(value_type = i64)]
    pub amount_cents: Cents,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub restaurant: String,
    pub transactions: Vec<ImportTransaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: u32,
}

/// A categorization rule: case-insensitive substring match on the bank
/// description; the lowest priority number wins.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRule {
    pub id: String,
    pub restaurant: String,
    pub pattern: String,
    pub account_code: String,
    pub priority: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRule {
    pub restaurant: String,
    pub pattern: String,
    pub account_code: String,
    pub priority: i64,
}

/// Outcome of categorizing one bank transaction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedTransaction {
    pub transaction: BankTransaction,
    pub entry: JournalEntry,
}

/// An expected settlement (rent check, vendor ACH) awaiting its bank row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingOutflow {
    pub id: String,
    pub restaurant: String,
    /// Positive expected amount; matched against bank rows of `-amount`.
    #[schema(value_type = i64)]
    pub amount_cents: Cents,
    pub expected_on: NaiveDate,
    pub memo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_transaction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePendingOutflow {
    pub restaurant: String,
    #[schema(value_type = i64)]
    pub amount_cents: Cents,
    pub expected_on: NaiveDate,
    pub memo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileRequest {
    pub restaurant: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPair {
    pub outflow: String,
    pub transaction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub pairs: Vec<MatchedPair>,
    pub unmatched_outflows: u32,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PnlQuery {
    pub restaurant: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantQuery {
    pub restaurant: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PnlRow {
    pub account_code: String,
    pub account_name: String,
    pub kind: AccountKind,
    #[schema(value_type = i64)]
    pub amount_cents: Cents,
}

/// Profit & loss over a period, aggregated from journal lines.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PnlReport {
    pub restaurant: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[schema(value_type = i64)]
    pub revenue_cents: Cents,
    #[schema(value_type = i64)]
    pub expense_cents: Cents,
    #[schema(value_type = i64)]
    pub net_cents: Cents,
    pub rows: Vec<PnlRow>,
}
