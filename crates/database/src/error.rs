use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("DATABASE_URL must be set to use the postgres backend.")]
    MissingDatabaseUrl,

    #[error("PostgreSQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Could not apply the finance schema: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The local store file exists but is not a valid snapshot.
    #[error("The local store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read or write the local store: {0}")]
    Io(#[from] std::io::Error),

    #[error("No {0} with id {1} exists.")]
    NotFound(&'static str, Uuid),

    #[error("A stored {0} record is malformed: {1}")]
    InvalidRecord(&'static str, String),
}
