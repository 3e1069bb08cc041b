//! # Database Infrastructure
//!
//! A unified interface for initializing and managing [SurrealDB](https://surrealdb.com)
//! connections across the workspace.
//!
//! ## Key Features
//! - **Engine agnostic**: `mem://`, `rocksdb://`, `ws://`, and `http://` via the `any` engine.
//! - **Resilient connectivity**: retrying health checks during engine startup.
//! - **Embedded migrations**: per-slice schema scripts applied on boot.
//! - **Row-level authorization**: record access + per-user scoped sessions,
//!   so table `PERMISSIONS` clauses do the authorization work.
//!
//! ## Example
//!
//! ```rust
//! use brigade_database::{Database, DatabaseError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DatabaseError> {
//!     let db = Database::builder()
//!         .url("mem://")
//!         .session("brigade", "core")
//!         .init()
//!         .await?;
//!
//!     let _version = db.version().await?;
//!     Ok(())
//! }
//! ```

mod auth;
mod error;
mod migrations;

use crate::auth::{Claims, RecordAccess};
pub use error::DatabaseError;
pub use surrealdb;
use jsonwebtoken::{Header, encode};
use migrations::MigrationRunner;
use moka::future::Cache;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::{info, instrument, trace, warn};

/// TTL in seconds for the JWTs minted for scoped database sessions.
static SESSION_TTL_SECONDS: i64 = 3600;
/// Bound on cached sessions so a scan of user ids cannot exhaust memory.
static MAX_CACHE_CAPACITY: u64 = 10_000;

/// Inner state of the [`Database`] wrapper.
#[derive(Debug)]
pub struct DatabaseInner {
    instance: Surreal<Any>,
    access: RecordAccess,
    sessions: Cache<String, Surreal<Any>>,
    ns: String,
    db: String,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        info!(ns = %self.ns, db = %self.db, "SurrealDB session handle dropped");
    }
}

/// `SurrealDB` client wrapper providing thread-safety and scoped sessions.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    /// Creates a new [`DatabaseBuilder`].
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.inner.instance
    }
}

/// A fluent builder for configuring and establishing a `SurrealDB` connection.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    url: Option<String>,
    ns: Option<String>,
    db: Option<String>,
    auth: Option<(String, String)>,
}

impl DatabaseBuilder {
    /// Creates a new [`DatabaseBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the namespace and database name.
    pub fn session(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.ns = Some(namespace.into());
        self.db = Some(database.into());
        self
    }

    /// Adds root credentials to the connection.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    /// Consumes the builder and establishes the connection.
    ///
    /// # Process
    /// 1. Validates that URL, namespace and database name were provided.
    /// 2. Connects the `any` engine and health-checks it, retrying with
    ///    exponential backoff (3 attempts starting at 500ms).
    /// 3. Signs in as root when credentials were provided.
    /// 4. Activates the namespace/database session.
    /// 5. Applies embedded migrations and registers record access.
    ///
    /// # Errors
    /// * [`DatabaseError::Validation`] if required parameters are missing.
    /// * [`DatabaseError::Connection`] if the engine fails to start or stays unhealthy.
    /// * [`DatabaseError::Auth`] if the credentials are rejected.
    /// * [`DatabaseError::Migration`] if a schema script fails or was edited.
    #[instrument(skip(self), fields(url = self.url, ns = self.ns, db = self.db))]
    pub async fn init(self) -> Result<Database, DatabaseError> {
        let url = self.url.ok_or_else(|| DatabaseError::Validation("URL is required".into()))?;
        let ns =
            self.ns.ok_or_else(|| DatabaseError::Validation("Namespace is required".into()))?;
        let db =
            self.db.ok_or_else(|| DatabaseError::Validation("Database is required".into()))?;

        let instance = connect(&url).await.map_err(|e| DatabaseError::Connection {
            message: e.to_string(),
            context: "Initializing engine".into(),
        })?;

        // 1. Connectivity & health check with retries
        let mut delay = Duration::from_millis(500);
        for attempt in 1..=3 {
            if instance.health().await.is_ok() {
                break;
            }
            if attempt == 3 {
                return Err(DatabaseError::Connection {
                    message: "Unhealthy after retries".into(),
                    context: url,
                });
            }
            warn!(attempt, ?delay, "Database not ready, retrying...");
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        // 2. Authentication
        if let Some((username, password)) = self.auth {
            instance.signin(Root { username, password }).await.map_err(|e| {
                DatabaseError::Auth { message: e.to_string(), context: url.clone() }
            })?;
        }

        // 3. Session activation
        instance.use_ns(&ns).use_db(&db).await?;

        let version =
            instance.version().await.map_or_else(|_| "unknown".to_owned(), |v| v.to_string());
        info!(namespace = %ns, database = %db, %version, "SurrealDB connection established");

        // 4. Migrations
        let report = MigrationRunner::new(instance.clone()).run().await?;
        for key in &report.skipped {
            trace!(migration = %key, "Skipping migration");
        }
        for key in &report.applied {
            info!(migration = %key, "Applied migration");
        }

        // 5. Record access for scoped sessions
        let access = RecordAccess::init()?;
        access.register(&instance).await?;

        let sessions = Cache::builder()
            .max_capacity(MAX_CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(SESSION_TTL_SECONDS.cast_unsigned() - 60))
            .build();

        Ok(Database { inner: Arc::new(DatabaseInner { instance, access, sessions, ns, db }) })
    }
}

impl Database {
    /// Returns a `SurrealDB` session scoped to the given user record.
    ///
    /// Mints a short-lived EdDSA JWT with `user:{id}` as subject and calls
    /// `authenticate(...)`, so queries on the returned handle are subject to
    /// the schema's `PERMISSIONS` clauses. Sessions are cached per user and
    /// expire one minute before the underlying token does.
    ///
    /// # Errors
    /// * [`DatabaseError::Auth`] if token signing fails or the database
    ///   rejects the token.
    /// * [`DatabaseError::Internal`] if the session cache misbehaves.
    #[instrument(skip(self), fields(user_id = %user_id.as_ref()))]
    pub async fn scoped_session(
        &self,
        user_id: impl AsRef<str>,
    ) -> Result<Surreal<Any>, DatabaseError> {
        let record_id = match user_id.as_ref().split_once(':') {
            Some(("user", _)) => user_id.as_ref().to_owned(),
            _ => format!("user:{}", user_id.as_ref()),
        };

        self.inner
            .sessions
            .try_get_with(record_id.clone(), async {
                let claims = Claims {
                    ns: &self.inner.ns,
                    db: &self.inner.db,
                    ac: "user",
                    id: record_id.clone(),
                    exp: (chrono::Utc::now() + chrono::Duration::seconds(SESSION_TTL_SECONDS))
                        .timestamp(),
                };

                let token = encode(
                    &Header::new(jsonwebtoken::Algorithm::EdDSA),
                    &claims,
                    &self.inner.access.encoding_key,
                )
                .map_err(|e| DatabaseError::Auth {
                    message: e.to_string(),
                    context: "Encoding session token".into(),
                })?;

                let session = self.inner.instance.clone();
                session.authenticate(token).await.map_err(|e| DatabaseError::Auth {
                    message: e.to_string(),
                    context: "SurrealDB rejected session token".into(),
                })?;

                Ok(session)
            })
            .await
            .map_err(|e: Arc<DatabaseError>| {
                Arc::try_unwrap(e).unwrap_or_else(|arc| DatabaseError::Internal(arc.to_string()))
            })
    }
}
