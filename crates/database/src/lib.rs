//! # Splitbook Database Crate
//!
//! This crate is the data-access layer: everything that lists, adds or removes
//! sales, costs and customers goes through the `FinanceStore` trait defined here.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate encapsulates all storage-specific logic. The rest
//!   of the application only sees `FinanceStore` and never the SQL or file format.
//! - **Two Backends:** `LocalStore` keeps everything in one JSON file for single-user,
//!   offline use; `DbRepository` talks to PostgreSQL through a pooled `sqlx` connection.
//! - **Asynchronous:** All operations are asynchronous so callers can fetch the
//!   collections concurrently.
//!
//! ## Public API
//!
//! - `FinanceStore`: the storage contract.
//! - `LocalStore`, `DbRepository`: the two implementations.
//! - `connect` / `run_migrations`: PostgreSQL pool setup and schema migrations.
//! - `open_store`: builds whichever backend the configuration selects.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod local;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use local::LocalStore;
pub use repository::DbRepository;
pub use store::FinanceStore;

use configuration::{StorageBackend, StorageSettings};
use std::sync::Arc;

/// Opens the backend selected by `settings.backend`, running migrations for PostgreSQL.
pub async fn open_store(settings: &StorageSettings) -> Result<Arc<dyn FinanceStore>, DbError> {
    match settings.backend {
        StorageBackend::Local => {
            let store = LocalStore::open(&settings.path).await?;
            tracing::info!(path = %settings.path.display(), "Using local store.");
            Ok(Arc::new(store))
        }
        StorageBackend::Postgres => {
            let pool = connect(settings).await?;
            run_migrations(&pool).await?;
            Ok(Arc::new(DbRepository::new(pool)))
        }
    }
}
