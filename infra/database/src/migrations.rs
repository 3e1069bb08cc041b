//! Embedded schema migrations.
//!
//! Each feature slice contributes one or more versioned SurrealQL scripts.
//! Scripts run inside a transaction together with the bookkeeping row in the
//! `migration` table; a checksum (SHA-256 of the script) guards against a
//! script being edited after it has shipped.

use crate::error::DatabaseError;
use fxhash::FxHashMap;
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::types::SurrealValue;
use surrealdb::engine::any::Any;
use tracing::info;

/// A single versioned schema script owned by one slice.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Migration {
    pub slice: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }

    fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.script.as_bytes()))
    }
}

/// All migrations in apply order. Append only; never edit a shipped script.
pub(crate) const MIGRATIONS: &[Migration] = &[
    Migration {
        slice: "kernel",
        version: "0001",
        script: "
            DEFINE TABLE IF NOT EXISTS migration SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS migration_key ON TABLE migration FIELDS key UNIQUE;
        ",
    },
    Migration {
        slice: "identity",
        version: "0001",
        script: "
            DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS member SCHEMALESS
                PERMISSIONS FOR select WHERE user = $auth.id;
            DEFINE INDEX IF NOT EXISTS member_unique ON TABLE member FIELDS user, restaurant UNIQUE;
        ",
    },
    Migration {
        slice: "scheduling",
        version: "0001",
        script: "
            DEFINE TABLE IF NOT EXISTS shift SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS shift_restaurant ON TABLE shift FIELDS restaurant, starts_at;
        ",
    },
    Migration {
        slice: "ledger",
        version: "0001",
        script: "
            DEFINE TABLE IF NOT EXISTS account SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS account_code ON TABLE account FIELDS restaurant, code UNIQUE;
            DEFINE TABLE IF NOT EXISTS journal_entry SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS journal_date ON TABLE journal_entry FIELDS restaurant, entry_date;
            DEFINE TABLE IF NOT EXISTS bank_transaction SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS category_rule SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS pending_outflow SCHEMALESS;
        ",
    },
    Migration {
        slice: "pos",
        version: "0001",
        script: "
            DEFINE TABLE IF NOT EXISTS unified_sale SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS sale_external ON TABLE unified_sale FIELDS vendor, external_id UNIQUE;
        ",
    },
    Migration {
        slice: "payroll",
        version: "0001",
        script: "
            DEFINE TABLE IF NOT EXISTS timesheet SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS timesheet_period ON TABLE timesheet FIELDS restaurant, period_start, employee UNIQUE;
        ",
    },
    Migration {
        slice: "billing",
        version: "0001",
        script: "
            DEFINE TABLE IF NOT EXISTS subscription SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS subscription_restaurant ON TABLE subscription FIELDS restaurant UNIQUE;
        ",
    },
    Migration {
        slice: "insights",
        version: "0001",
        script: "
            DEFINE TABLE IF NOT EXISTS insight SCHEMALESS;
        ",
    },
];

#[derive(Debug, SurrealValue)]
struct AppliedMigration {
    key: String,
    checksum: String,
}

/// Outcome of a migration run, for startup logging.
#[derive(Debug, Default)]
pub(crate) struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner {
    db: Surreal<Any>,
}

impl MigrationRunner {
    pub(crate) const fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        let mut report = MigrationReport::default();
        let applied = self.applied_map().await?;

        for migration in MIGRATIONS {
            let key = migration.key();
            if let Some(existing_checksum) = applied.get(&key) {
                ensure_checksum_match(migration, existing_checksum)?;
                report.skipped.push(key);
                continue;
            }

            self.apply(migration).await?;
            report.applied.push(key);
        }

        Ok(report)
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DatabaseError> {
        info!(slice = migration.slice, version = migration.version, "Applying migration");

        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration SET key = $key, checksum = $checksum, applied_at = time::now();
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(&query)
            .bind(("key", migration.key()))
            .bind(("checksum", migration.checksum()))
            .await
            .map_err(|e| {
                DatabaseError::Migration(format!(
                    "SQL execution failed at {}:{}: {e}",
                    migration.slice, migration.version
                ))
            })?
            .check()
            .map_err(surrealdb::Error::from)?;

        Ok(())
    }

    async fn applied_map(&self) -> Result<FxHashMap<String, String>, DatabaseError> {
        // First boot: the migration table itself does not exist yet.
        let tables_defined = self
            .db
            .query("!(SELECT VALUE tables FROM ONLY INFO FOR DB).is_empty()")
            .await?
            .take::<Option<bool>>(0)?
            .unwrap_or_default();

        if !tables_defined {
            return Ok(FxHashMap::default());
        }

        let entries = self
            .db
            .query("SELECT key, checksum FROM migration")
            .await
            .map_err(|e| DatabaseError::Migration(format!("Loading applied migrations: {e}")))?
            .take::<Vec<AppliedMigration>>(0)
            .map_err(|e| DatabaseError::Migration(format!("Parsing applied migrations: {e}")))?;

        Ok(entries.into_iter().map(|entry| (entry.key, entry.checksum)).collect())
    }
}

fn ensure_checksum_match(migration: &Migration, existing: &str) -> Result<(), DatabaseError> {
    let current = migration.checksum();
    if existing != current {
        return Err(DatabaseError::Migration(format!(
            "Checksum mismatch for {}:{} (recorded {existing}, script hashes to {current})",
            migration.slice, migration.version
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_keys_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for migration in MIGRATIONS {
            assert!(seen.insert(migration.key()), "duplicate migration key {}", migration.key());
        }
    }

    #[test]
    fn bootstrap_migration_comes_first() {
        assert_eq!(MIGRATIONS[0].slice, "kernel");
        assert!(MIGRATIONS[0].script.contains("DEFINE TABLE IF NOT EXISTS migration"));
    }

    #[test]
    fn checksum_detects_edits() {
        let migration = MIGRATIONS[0];
        let recorded = migration.checksum();
        assert!(ensure_checksum_match(&migration, &recorded).is_ok());
        assert!(ensure_checksum_match(&migration, "deadbeef").is_err());
    }
}
