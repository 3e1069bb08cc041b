use brigade_database::Database;
use brigade_domain::events::SalesSynced;
use brigade_domain::money::Cents;
use brigade_kernel::envelope::ApiError;
use brigade_ledger::models::{
    AccountKind, BankTxStatus, CreateAccount, CreateCategoryRule, CreateJournalEntry,
    CreatePendingOutflow, ImportRequest, ImportTransaction, JournalLine, codes,
};
use brigade_ledger::{sales, service};
use chrono::NaiveDate;

async fn test_db() -> Database {
    Database::builder()
        .url("mem://")
        .session("brigade", "test")
        .init()
        .await
        .expect("in-memory database")
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
}

async fn seed_chart(db: &Database) {
    service::ensure_default_accounts(db, "r1").await.expect("defaults");
    service::create_account(
        db,
        CreateAccount {
            restaurant: "r1".to_owned(),
            code: "5000".to_owned(),
            name: "Food Cost".to_owned(),
            kind: AccountKind::Expense,
        },
    )
    .await
    .expect("expense account");
}

async fn balance_of(db: &Database, code: &str) -> Cents {
    let accounts = service::list_accounts(db, "r1").await.expect("accounts");
    accounts.iter().find(|a| a.code == code).expect("account exists").balance_cents
}

#[tokio::test]
async fn default_chart_is_idempotent() {
    let db = test_db().await;
    service::ensure_default_accounts(&db, "r1").await.expect("first");
    service::ensure_default_accounts(&db, "r1").await.expect("second");

    let accounts = service::list_accounts(&db, "r1").await.expect("accounts");
    assert_eq!(accounts.len(), 4);
}

#[tokio::test]
async fn duplicate_account_code_conflicts() {
    let db = test_db().await;
    seed_chart(&db).await;

    let err = service::create_account(
        &db,
        CreateAccount {
            restaurant: "r1".to_owned(),
            code: codes::CASH.to_owned(),
            name: "Cash again".to_owned(),
            kind: AccountKind::Asset,
        },
    )
    .await
    .expect_err("duplicate code");
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn posting_updates_balances() {
    let db = test_db().await;
    seed_chart(&db).await;

    service::post_entry(
        &db,
        CreateJournalEntry {
            restaurant: "r1".to_owned(),
            entry_date: day(24),
            memo: "Catering deposit".to_owned(),
            lines: vec![
                JournalLine::debit(codes::CASH, Cents(25_000)),
                JournalLine::credit(codes::SALES_REVENUE, Cents(25_000)),
            ],
        },
        None,
    )
    .await
    .expect("post");

    assert_eq!(balance_of(&db, codes::CASH).await, Cents(25_000));
    assert_eq!(balance_of(&db, codes::SALES_REVENUE).await, Cents(-25_000));
}

#[tokio::test]
async fn unknown_account_code_is_rejected_before_posting() {
    let db = test_db().await;
    seed_chart(&db).await;

    let err = service::post_entry(
        &db,
        CreateJournalEntry {
            restaurant: "r1".to_owned(),
            entry_date: day(24),
            memo: "typo".to_owned(),
            lines: vec![
                JournalLine::debit("9999", Cents(100)),
                JournalLine::credit(codes::CASH, Cents(100)),
            ],
        },
        None,
    )
    .await
    .expect_err("unknown code");
    assert!(matches!(err, ApiError::Validation(_)));

    // Nothing persisted, nothing applied.
    assert_eq!(balance_of(&db, codes::CASH).await, Cents::ZERO);
    let entries = service::entries_between(&db, "r1", day(1), day(31)).await.expect("entries");
    assert!(entries.is_empty());
}

#[tokio::test]
async fn categorize_outflow_posts_expense_entry() {
    let db = test_db().await;
    seed_chart(&db).await;
    service::create_rule(
        &db,
        CreateCategoryRule {
            restaurant: "r1".to_owned(),
            pattern: "sysco".to_owned(),
            account_code: "5000".to_owned(),
            priority: 1,
        },
    )
    .await
    .expect("rule");

    let imported = service::import_transactions(
        &db,
        ImportRequest {
            restaurant: "r1".to_owned(),
            transactions: vec![ImportTransaction {
                posted_at: day(24),
                amount_cents: Cents(-42_150),
                description: "SYSCO FOOD SVC 0423".to_owned(),
            }],
        },
    )
    .await
    .expect("import");
    assert_eq!(imported, 1);

    let ids: Vec<String> = db
        .query("SELECT VALUE record::id(id) FROM bank_transaction")
        .await
        .expect("query")
        .take(0)
        .expect("ids");

    let outcome = service::categorize(&db, &ids[0]).await.expect("categorize");
    assert_eq!(outcome.transaction.status, BankTxStatus::Categorized);
    assert_eq!(outcome.entry.lines.len(), 2);
    assert_eq!(outcome.entry.lines[0], JournalLine::debit("5000", Cents(42_150)));
    assert_eq!(outcome.entry.lines[1], JournalLine::credit(codes::CASH, Cents(42_150)));

    assert_eq!(balance_of(&db, "5000").await, Cents(42_150));
    assert_eq!(balance_of(&db, codes::CASH).await, Cents(-42_150));

    // Replaying categorization conflicts.
    let err = service::categorize(&db, &ids[0]).await.expect_err("already categorized");
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn categorize_without_matching_rule_fails_clean() {
    let db = test_db().await;
    seed_chart(&db).await;

    service::import_transactions(
        &db,
        ImportRequest {
            restaurant: "r1".to_owned(),
            transactions: vec![ImportTransaction {
                posted_at: day(24),
                amount_cents: Cents(-999),
                description: "MYSTERY VENDOR".to_owned(),
            }],
        },
    )
    .await
    .expect("import");

    let ids: Vec<String> = db
        .query("SELECT VALUE record::id(id) FROM bank_transaction")
        .await
        .expect("query")
        .take(0)
        .expect("ids");

    let err = service::categorize(&db, &ids[0]).await.expect_err("no rule");
    assert!(matches!(err, ApiError::Validation(_)));

    let tx = service::get_transaction(&db, &ids[0]).await.expect("tx");
    assert_eq!(tx.status, BankTxStatus::Unreviewed);
}

#[tokio::test]
async fn pnl_aggregates_journal_lines() {
    let db = test_db().await;
    seed_chart(&db).await;

    service::post_entry(
        &db,
        CreateJournalEntry {
            restaurant: "r1".to_owned(),
            entry_date: day(24),
            memo: "Sales".to_owned(),
            lines: vec![
                JournalLine::debit(codes::CASH, Cents(100_000)),
                JournalLine::credit(codes::SALES_REVENUE, Cents(100_000)),
            ],
        },
        None,
    )
    .await
    .expect("sales");

    service::post_entry(
        &db,
        CreateJournalEntry {
            restaurant: "r1".to_owned(),
            entry_date: day(25),
            memo: "Produce".to_owned(),
            lines: vec![
                JournalLine::debit("5000", Cents(30_000)),
                JournalLine::credit(codes::CASH, Cents(30_000)),
            ],
        },
        None,
    )
    .await
    .expect("expense");

    // Outside the window; must not count.
    service::post_entry(
        &db,
        CreateJournalEntry {
            restaurant: "r1".to_owned(),
            entry_date: day(1),
            memo: "Old".to_owned(),
            lines: vec![
                JournalLine::debit("5000", Cents(5_000)),
                JournalLine::credit(codes::CASH, Cents(5_000)),
            ],
        },
        None,
    )
    .await
    .expect("old");

    let report = service::pnl(&db, "r1", day(20), day(31)).await.expect("pnl");
    assert_eq!(report.revenue_cents, Cents(100_000));
    assert_eq!(report.expense_cents, Cents(30_000));
    assert_eq!(report.net_cents, Cents(70_000));
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].account_code, "5000");
    assert_eq!(report.rows[1].account_code, codes::SALES_REVENUE);
}

#[tokio::test]
async fn reconcile_pairs_outflows_with_bank_rows() {
    let db = test_db().await;
    seed_chart(&db).await;

    let rent = service::create_pending_outflow(
        &db,
        CreatePendingOutflow {
            restaurant: "r1".to_owned(),
            amount_cents: Cents(350_000),
            expected_on: day(25),
            memo: "August rent".to_owned(),
        },
    )
    .await
    .expect("outflow");

    service::create_pending_outflow(
        &db,
        CreatePendingOutflow {
            restaurant: "r1".to_owned(),
            amount_cents: Cents(12_000),
            expected_on: day(25),
            memo: "Linen service".to_owned(),
        },
    )
    .await
    .expect("second outflow");

    service::import_transactions(
        &db,
        ImportRequest {
            restaurant: "r1".to_owned(),
            transactions: vec![
                ImportTransaction {
                    posted_at: day(27),
                    amount_cents: Cents(-350_000),
                    description: "CHECK 1104".to_owned(),
                },
                // Same amount but outside the 3-day window.
                ImportTransaction {
                    posted_at: day(15),
                    amount_cents: Cents(-12_000),
                    description: "ACH LINEN".to_owned(),
                },
            ],
        },
    )
    .await
    .expect("import");

    let report = service::reconcile(&db, "r1").await.expect("reconcile");
    assert_eq!(report.pairs.len(), 1);
    assert_eq!(report.pairs[0].outflow, rent.id);
    assert_eq!(report.unmatched_outflows, 1);

    let outflows = service::list_pending_outflows(&db, "r1").await.expect("list");
    let matched = outflows.iter().find(|o| o.id == rent.id).expect("rent");
    assert!(matched.matched_transaction.is_some());

    let tx = service::get_transaction(&db, matched.matched_transaction.as_deref().unwrap())
        .await
        .expect("tx");
    assert_eq!(tx.status, BankTxStatus::Reconciled);
}

#[tokio::test]
async fn daily_sales_event_posts_and_supersedes() {
    let db = test_db().await;

    let event = SalesSynced {
        restaurant: "r1".to_owned(),
        date: day(24),
        orders: 31,
        gross_cents: Cents(80_000),
        tax_cents: Cents(6_000),
        tip_cents: Cents(9_000),
    };
    sales::post_daily_sales(&db, &event).await.expect("first post");

    assert_eq!(balance_of(&db, codes::CASH).await, Cents(80_000));
    assert_eq!(balance_of(&db, codes::SALES_REVENUE).await, Cents(-65_000));
    assert_eq!(balance_of(&db, codes::SALES_TAX_PAYABLE).await, Cents(-6_000));
    assert_eq!(balance_of(&db, codes::TIPS_PAYABLE).await, Cents(-9_000));

    // A replayed webhook recomputes the day; totals must not double-count.
    let updated = SalesSynced { gross_cents: Cents(90_000), ..event };
    sales::post_daily_sales(&db, &updated).await.expect("second post");

    assert_eq!(balance_of(&db, codes::CASH).await, Cents(90_000));
    assert_eq!(balance_of(&db, codes::SALES_REVENUE).await, Cents(-75_000));

    let entries = service::entries_between(&db, "r1", day(24), day(24)).await.expect("entries");
    assert_eq!(entries.len(), 1, "old daily entry must be superseded");
}
