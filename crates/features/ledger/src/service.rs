//! Ledger persistence: chart of accounts, journal posting with balance
//! upkeep, bank feed categorization, P&L aggregation and pending-outflow
//! reconciliation.
//!
//! Posting is a sequence of individual statements, not a distributed
//! transaction: the entry lands first, then per-account balance updates. A
//! failed balance update triggers a best-effort compensating unpost.

use crate::entry::validate_lines;
use crate::models::{
    Account, AccountKind, BankTransaction, BankTxStatus, CategorizedTransaction, CategoryRule,
    CreateAccount, CreateCategoryRule, CreateJournalEntry, CreatePendingOutflow, ImportRequest,
    JournalEntry, JournalLine, MatchedPair, PendingOutflow, PnlReport, PnlRow, ReconcileReport,
    codes,
};
use crate::rules::match_rule;
use brigade_database::Database;
use brigade_domain::money::Cents;
use brigade_kernel::envelope::ApiError;
use brigade_kernel::safe_nanoid;
use chrono::NaiveDate;
use fxhash::FxHashMap;
use tracing::warn;

const ACCOUNT_FIELDS: &str = "record::id(id) AS id, restaurant, code, name, kind, balance_cents";
const ENTRY_FIELDS: &str = "record::id(id) AS id, restaurant, entry_date, memo, source, lines";
const TX_FIELDS: &str =
    "record::id(id) AS id, restaurant, posted_at, amount_cents, description, status, journal_entry";
const RULE_FIELDS: &str = "record::id(id) AS id, restaurant, pattern, account_code, priority";
const OUTFLOW_FIELDS: &str =
    "record::id(id) AS id, restaurant, amount_cents, expected_on, memo, matched_transaction";

/// Days of slack when pairing a pending outflow with its bank row.
const RECONCILE_WINDOW_DAYS: i64 = 3;

// --- Chart of accounts ---

/// Lists the chart of accounts, ordered by code.
///
/// # Errors
/// Database failures only.
pub async fn list_accounts(db: &Database, restaurant: &str) -> Result<Vec<Account>, ApiError> {
    let accounts: Vec<Account> = db
        .query(format!(
            "SELECT {ACCOUNT_FIELDS} FROM account WHERE restaurant = $restaurant ORDER BY code"
        ))
        .bind(("restaurant", restaurant.to_owned()))
        .await?
        .take(0)?;

    Ok(accounts)
}

/// Creates one account with a zero opening balance.
///
/// # Errors
/// [`ApiError::Conflict`] when the code is already taken at this restaurant.
pub async fn create_account(db: &Database, req: CreateAccount) -> Result<Account, ApiError> {
    if req.code.is_empty() || req.name.is_empty() {
        return Err(ApiError::Validation("account code and name are required".to_owned()));
    }

    let existing: Vec<String> = db
        .query(
            "SELECT VALUE code FROM account WHERE restaurant = $restaurant AND code = $code",
        )
        .bind(("restaurant", req.restaurant.clone()))
        .bind(("code", req.code.clone()))
        .await?
        .take(0)?;
    if !existing.is_empty() {
        return Err(ApiError::Conflict(format!("account code {} already exists", req.code)));
    }

    let id = safe_nanoid!();
    db.query(
        "CREATE type::thing('account', $id) SET restaurant = $restaurant, code = $code, \
         name = $name, kind = $kind, balance_cents = 0",
    )
    .bind(("id", id.clone()))
    .bind(("restaurant", req.restaurant.clone()))
    .bind(("code", req.code.clone()))
    .bind(("name", req.name.clone()))
    .bind(("kind", req.kind))
    .await?
    .check()?;

    Ok(Account {
        id,
        restaurant: req.restaurant,
        code: req.code,
        name: req.name,
        kind: req.kind,
        balance_cents: Cents::ZERO,
    })
}

/// Creates the well-known accounts the automated flows post against, if
/// they are missing. Idempotent.
///
/// # Errors
/// Database failures only.
pub async fn ensure_default_accounts(db: &Database, restaurant: &str) -> Result<(), ApiError> {
    let defaults: [(&str, &str, AccountKind); 4] = [
        (codes::CASH, "Cash", AccountKind::Asset),
        (codes::SALES_TAX_PAYABLE, "Sales Tax Payable", AccountKind::Liability),
        (codes::TIPS_PAYABLE, "Tips Payable", AccountKind::Liability),
        (codes::SALES_REVENUE, "Sales Revenue", AccountKind::Revenue),
    ];

    let existing = accounts_by_code(db, restaurant).await?;
    for (code, name, kind) in defaults {
        if existing.contains_key(code) {
            continue;
        }
        create_account(
            db,
            CreateAccount {
                restaurant: restaurant.to_owned(),
                code: code.to_owned(),
                name: name.to_owned(),
                kind,
            },
        )
        .await?;
    }

    Ok(())
}

async fn accounts_by_code(
    db: &Database,
    restaurant: &str,
) -> Result<FxHashMap<String, Account>, ApiError> {
    let accounts = list_accounts(db, restaurant).await?;
    Ok(accounts.into_iter().map(|account| (account.code.clone(), account)).collect())
}

// --- Journal posting ---

async fn apply_delta(
    db: &Database,
    restaurant: &str,
    code: &str,
    delta: Cents,
) -> Result<(), ApiError> {
    db.query(
        "UPDATE account SET balance_cents += $delta \
         WHERE restaurant = $restaurant AND code = $code",
    )
    .bind(("restaurant", restaurant.to_owned()))
    .bind(("code", code.to_owned()))
    .bind(("delta", delta))
    .await?
    .check()?;

    Ok(())
}

async fn delete_entry_record(db: &Database, key: &str) -> Result<(), ApiError> {
    db.query("DELETE type::thing('journal_entry', $key)")
        .bind(("key", key.to_owned()))
        .await?
        .check()?;
    Ok(())
}

/// Validates and persists a journal entry, then applies the balance deltas.
///
/// On a failed balance update the already-applied deltas are reverted and
/// the entry record deleted, both best-effort, before the error surfaces.
///
/// # Errors
/// [`ApiError::Validation`] for broken invariants or unknown account codes;
/// database failures otherwise.
pub async fn post_entry(
    db: &Database,
    req: CreateJournalEntry,
    source: Option<&str>,
) -> Result<JournalEntry, ApiError> {
    validate_lines(&req.lines)?;

    let accounts = accounts_by_code(db, &req.restaurant).await?;
    for line in &req.lines {
        if !accounts.contains_key(&line.account_code) {
            return Err(ApiError::Validation(format!(
                "unknown account code {}",
                line.account_code
            )));
        }
    }

    let id = safe_nanoid!();
    db.query(
        "CREATE type::thing('journal_entry', $id) SET restaurant = $restaurant, \
         entry_date = $entry_date, memo = $memo, source = $source, lines = $lines",
    )
    .bind(("id", id.clone()))
    .bind(("restaurant", req.restaurant.clone()))
    .bind(("entry_date", req.entry_date))
    .bind(("memo", req.memo.clone()))
    .bind(("source", source.map(str::to_owned)))
    .bind(("lines", req.lines.clone()))
    .await?
    .check()?;

    let mut applied: Vec<&JournalLine> = Vec::with_capacity(req.lines.len());
    for line in &req.lines {
        match apply_delta(db, &req.restaurant, &line.account_code, line.delta()).await {
            Ok(()) => applied.push(line),
            Err(error) => {
                warn!(entry = %id, account = %line.account_code, %error,
                    "Balance update failed; compensating");
                for done in applied {
                    if let Err(revert) =
                        apply_delta(db, &req.restaurant, &done.account_code, -done.delta()).await
                    {
                        warn!(entry = %id, account = %done.account_code, %revert,
                            "Compensating balance revert failed");
                    }
                }
                if let Err(delete) = delete_entry_record(db, &id).await {
                    warn!(entry = %id, %delete, "Compensating entry delete failed");
                }
                return Err(error);
            },
        }
    }

    Ok(JournalEntry {
        id,
        restaurant: req.restaurant,
        entry_date: req.entry_date,
        memo: req.memo,
        source: source.map(str::to_owned),
        lines: req.lines,
    })
}

/// Reverts an entry: balance deltas are negated (best-effort, logged) and
/// the record deleted. Used when an automated entry is superseded.
///
/// # Errors
/// Database failures from the final delete.
pub async fn unpost_entry(db: &Database, entry: &JournalEntry) -> Result<(), ApiError> {
    for line in &entry.lines {
        if let Err(error) =
            apply_delta(db, &entry.restaurant, &line.account_code, -line.delta()).await
        {
            warn!(entry = %entry.id, account = %line.account_code, %error,
                "Balance revert failed during unpost");
        }
    }
    delete_entry_record(db, &entry.id).await
}

/// Entries of one restaurant whose date falls in `[from, to]`.
///
/// # Errors
/// Database failures only.
pub async fn entries_between(
    db: &Database,
    restaurant: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<JournalEntry>, ApiError> {
    let entries: Vec<JournalEntry> = db
        .query(format!(
            "SELECT {ENTRY_FIELDS} FROM journal_entry \
             WHERE restaurant = $restaurant AND entry_date >= $from AND entry_date <= $to \
             ORDER BY entry_date"
        ))
        .bind(("restaurant", restaurant.to_owned()))
        .bind(("from", from))
        .bind(("to", to))
        .await?
        .take(0)?;

    Ok(entries)
}

/// The entry a given automated source posted for one date, if any.
///
/// # Errors
/// Database failures only.
pub async fn entry_for_source(
    db: &Database,
    restaurant: &str,
    source: &str,
    entry_date: NaiveDate,
) -> Result<Option<JournalEntry>, ApiError> {
    let entry: Option<JournalEntry> = db
        .query(format!(
            "SELECT {ENTRY_FIELDS} FROM journal_entry \
             WHERE restaurant = $restaurant AND source = $source AND entry_date = $entry_date \
             LIMIT 1"
        ))
        .bind(("restaurant", restaurant.to_owned()))
        .bind(("source", source.to_owned()))
        .bind(("entry_date", entry_date))
        .await?
        .take(0)?;

    Ok(entry)
}

// --- Bank feed ---

/// Bulk-creates bank transactions in `unreviewed` state. Returns the count.
///
/// # Errors
/// Database failures only.
pub async fn import_transactions(db: &Database, req: ImportRequest) -> Result<u32, ApiError> {
    let mut imported = 0u32;
    for tx in req.transactions {
        db.query(
            "CREATE type::thing('bank_transaction', $id) SET restaurant = $restaurant, \
             posted_at = $posted_at, amount_cents = $amount_cents, \
             description = $description, status = 'unreviewed', journal_entry = NONE",
        )
        .bind(("id", safe_nanoid!()))
        .bind(("restaurant", req.restaurant.clone()))
        .bind(("posted_at", tx.posted_at))
        .bind(("amount_cents", tx.amount_cents))
        .bind(("description", tx.description))
        .await?
        .check()?;
        imported += 1;
    }

    Ok(imported)
}

/// Loads one bank transaction by record key.
///
/// # Errors
/// [`ApiError::NotFound`] when the record does not exist.
pub async fn get_transaction(db: &Database, key: &str) -> Result<BankTransaction, ApiError> {
    let tx: Option<BankTransaction> = db
        .query(format!("SELECT {TX_FIELDS} FROM ONLY type::thing('bank_transaction', $key)"))
        .bind(("key", key.to_owned()))
        .await?
        .take(0)?;

    tx.ok_or_else(|| ApiError::NotFound(format!("bank_transaction:{key}")))
}

/// Category rules for one restaurant, best match first.
///
/// # Errors
/// Database failures only.
pub async fn list_rules(db: &Database, restaurant: &str) -> Result<Vec<CategoryRule>, ApiError> {
    let rules: Vec<CategoryRule> = db
        .query(format!(
            "SELECT {RULE_FIELDS} FROM category_rule \
             WHERE restaurant = $restaurant ORDER BY priority"
        ))
        .bind(("restaurant", restaurant.to_owned()))
        .await?
        .take(0)?;

    Ok(rules)
}

/// Creates one categorization rule.
///
/// # Errors
/// [`ApiError::Validation`] for an empty pattern or unknown account code.
pub async fn create_rule(db: &Database, req: CreateCategoryRule) -> Result<CategoryRule, ApiError> {
    if req.pattern.trim().is_empty() {
        return Err(ApiError::Validation("rule pattern must not be empty".to_owned()));
    }
    let accounts = accounts_by_code(db, &req.restaurant).await?;
    if !accounts.contains_key(&req.account_code) {
        return Err(ApiError::Validation(format!("unknown account code {}", req.account_code)));
    }

    let id = safe_nanoid!();
    db.query(
        "CREATE type::thing('category_rule', $id) SET restaurant = $restaurant, \
         pattern = $pattern, account_code = $account_code, priority = $priority",
    )
    .bind(("id", id.clone()))
    .bind(("restaurant", req.restaurant.clone()))
    .bind(("pattern", req.pattern.clone()))
    .bind(("account_code", req.account_code.clone()))
    .bind(("priority", req.priority))
    .await?
    .check()?;

    Ok(CategoryRule {
        id,
        restaurant: req.restaurant,
        pattern: req.pattern,
        account_code: req.account_code,
        priority: req.priority,
    })
}

/// Categorizes one unreviewed bank transaction: matches the description
/// against the rules, posts the balanced journal entry and marks the
/// transaction `categorized`. A failed posting leaves it `unreviewed`.
///
/// # Errors
/// [`ApiError::Conflict`] when already processed, [`ApiError::Validation`]
/// when no rule matches.
pub async fn categorize(db: &Database, key: &str) -> Result<CategorizedTransaction, ApiError> {
    let tx = get_transaction(db, key).await?;
    if tx.status != BankTxStatus::Unreviewed {
        return Err(ApiError::Conflict(format!("bank_transaction:{key} is already processed")));
    }

    let rules = list_rules(db, &tx.restaurant).await?;
    let rule = match_rule(&tx.description, &rules).ok_or_else(|| {
        ApiError::Validation(format!("no category rule matches '{}'", tx.description))
    })?;

    let amount = tx.amount_cents.abs();
    let lines = if tx.amount_cents.is_outflow() {
        vec![JournalLine::debit(&rule.account_code, amount), JournalLine::credit(codes::CASH, amount)]
    } else {
        vec![JournalLine::debit(codes::CASH, amount), JournalLine::credit(&rule.account_code, amount)]
    };

    let entry = post_entry(
        db,
        CreateJournalEntry {
            restaurant: tx.restaurant.clone(),
            entry_date: tx.posted_at,
            memo: tx.description.clone(),
            lines,
        },
        Some("bank"),
    )
    .await?;

    db.query(
        "UPDATE type::thing('bank_transaction', $key) \
         SET status = 'categorized', journal_entry = $entry",
    )
    .bind(("key", key.to_owned()))
    .bind(("entry", entry.id.clone()))
    .await?
    .check()?;

    let mut tx = tx;
    tx.status = BankTxStatus::Categorized;
    tx.journal_entry = Some(entry.id.clone());

    Ok(CategorizedTransaction { transaction: tx, entry })
}

// --- P&L ---

/// Aggregates revenue and expense activity over `[from, to]` from journal
/// lines. Account balances are not consulted, so bank and POS flows land in
/// one report.
///
/// # Errors
/// Database failures only.
pub async fn pnl(
    db: &Database,
    restaurant: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PnlReport, ApiError> {
    if from > to {
        return Err(ApiError::Validation("'from' must not be after 'to'".to_owned()));
    }

    let accounts = accounts_by_code(db, restaurant).await?;
    let entries = entries_between(db, restaurant, from, to).await?;

    let mut activity: FxHashMap<String, Cents> = FxHashMap::default();
    for entry in &entries {
        for line in &entry.lines {
            *activity.entry(line.account_code.clone()).or_insert(Cents::ZERO) += line.delta();
        }
    }

    let mut rows: Vec<PnlRow> = Vec::new();
    for (code, delta) in activity {
        let Some(account) = accounts.get(&code) else { continue };
        let amount = match account.kind {
            // Revenue grows on the credit side, expenses on the debit side.
            AccountKind::Revenue => -delta,
            AccountKind::Expense => delta,
            AccountKind::Asset | AccountKind::Liability | AccountKind::Equity => continue,
        };
        if amount == Cents::ZERO {
            continue;
        }
        rows.push(PnlRow {
            account_code: code,
            account_name: account.name.clone(),
            kind: account.kind,
            amount_cents: amount,
        });
    }
    rows.sort_by(|a, b| a.account_code.cmp(&b.account_code));

    let revenue_cents = rows
        .iter()
        .filter(|row| row.kind == AccountKind::Revenue)
        .fold(Cents::ZERO, |sum, row| sum.saturating_add(row.amount_cents));
    let expense_cents = rows
        .iter()
        .filter(|row| row.kind == AccountKind::Expense)
        .fold(Cents::ZERO, |sum, row| sum.saturating_add(row.amount_cents));

    Ok(PnlReport {
        restaurant: restaurant.to_owned(),
        from,
        to,
        revenue_cents,
        expense_cents,
        net_cents: revenue_cents - expense_cents,
        rows,
    })
}

// --- Pending outflows ---

/// Registers an expected settlement.
///
/// # Errors
/// [`ApiError::Validation`] for a non-positive amount.
pub async fn create_pending_outflow(
    db: &Database,
    req: CreatePendingOutflow,
) -> Result<PendingOutflow, ApiError> {
    if req.amount_cents <= Cents::ZERO {
        return Err(ApiError::Validation("expected amount must be positive".to_owned()));
    }

    let id = safe_nanoid!();
    db.query(
        "CREATE type::thing('pending_outflow', $id) SET restaurant = $restaurant, \
         amount_cents = $amount_cents, expected_on = $expected_on, memo = $memo, \
         matched_transaction = NONE",
    )
    .bind(("id", id.clone()))
    .bind(("restaurant", req.restaurant.clone()))
    .bind(("amount_cents", req.amount_cents))
    .bind(("expected_on", req.expected_on))
    .bind(("memo", req.memo.clone()))
    .await?
    .check()?;

    Ok(PendingOutflow {
        id,
        restaurant: req.restaurant,
        amount_cents: req.amount_cents,
        expected_on: req.expected_on,
        memo: req.memo,
        matched_transaction: None,
    })
}

/// Pairs unmatched pending outflows with bank rows of the opposite amount
/// posted within [`RECONCILE_WINDOW_DAYS`] of the expected date. Matched
/// bank rows move to `reconciled`.
///
/// # Errors
/// Database failures only.
pub async fn reconcile(db: &Database, restaurant: &str) -> Result<ReconcileReport, ApiError> {
    let outflows: Vec<PendingOutflow> = db
        .query(format!(
            "SELECT {OUTFLOW_FIELDS} FROM pending_outflow \
             WHERE restaurant = $restaurant AND matched_transaction = NONE \
             ORDER BY expected_on"
        ))
        .bind(("restaurant", restaurant.to_owned()))
        .await?
        .take(0)?;

    let candidates: Vec<BankTransaction> = db
        .query(format!(
            "SELECT {TX_FIELDS} FROM bank_transaction \
             WHERE restaurant = $restaurant AND status != 'reconciled' \
             ORDER BY posted_at"
        ))
        .bind(("restaurant", restaurant.to_owned()))
        .await?
        .take(0)?;

    let mut used: Vec<&str> = Vec::new();
    let mut pairs: Vec<MatchedPair> = Vec::new();
    let mut unmatched = 0u32;

    for outflow in &outflows {
        let hit = candidates.iter().find(|tx| {
            !used.contains(&tx.id.as_str())
                && tx.amount_cents == -outflow.amount_cents
                && (tx.posted_at - outflow.expected_on).num_days().abs() <= RECONCILE_WINDOW_DAYS
        });

        let Some(tx) = hit else {
            unmatched += 1;
            continue;
        };
        used.push(&tx.id);

        db.query(
            "UPDATE type::thing('pending_outflow', $outflow) SET matched_transaction = $tx;
             UPDATE type::thing('bank_transaction', $tx) SET status = 'reconciled';",
        )
        .bind(("outflow", outflow.id.clone()))
        .bind(("tx", tx.id.clone()))
        .await?
        .check()?;

        pairs.push(MatchedPair { outflow: outflow.id.clone(), transaction: tx.id.clone() });
    }

    Ok(ReconcileReport { pairs, unmatched_outflows: unmatched })
}

/// Pending outflows for one restaurant, unmatched first.
///
/// # Errors
/// Database failures only.
pub async fn list_pending_outflows(
    db: &Database,
    restaurant: &str,
) -> Result<Vec<PendingOutflow>, ApiError> {
    let outflows: Vec<PendingOutflow> = db
        .query(format!(
            "SELECT {OUTFLOW_FIELDS} FROM pending_outflow \
             WHERE restaurant = $restaurant ORDER BY matched_transaction, expected_on"
        ))
        .bind(("restaurant", restaurant.to_owned()))
        .await?
        .take(0)?;

    Ok(outflows)
}
