/// Errors surfaced by the database infrastructure layer.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Database validation error: {0}")]
    Validation(String),

    #[error("Database connection error ({context}): {message}")]
    Connection { message: String, context: String },

    #[error("Database auth error ({context}): {message}")]
    Auth { message: String, context: String },

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Internal database error: {0}")]
    Internal(String),
}
