use crate::error::DbError;
use configuration::StorageSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::time::Duration;

/// Opens the PostgreSQL pool for the postgres backend.
///
/// The connection string comes from `DATABASE_URL`; a `.env` file in the working
/// directory is read first if one exists. Pool size and acquire timeout come from
/// `[storage]`.
pub async fn connect(settings: &StorageSettings) -> Result<PgPool, DbError> {
    dotenvy::dotenv().ok();
    let database_url = env::var("DATABASE_URL").map_err(|_| DbError::MissingDatabaseUrl)?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections = settings.max_connections, "Connected to PostgreSQL.");
    Ok(pool)
}

/// Creates the customers, costs and sales tables if they are missing.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::debug!("Finance schema is up to date.");
    Ok(())
}
