use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The form input was rejected; nothing was written.
    #[error("Rejected input: {0}")]
    Validation(#[from] core_types::CoreError),

    #[error("Storage error: {0}")]
    Database(#[from] database::DbError),
}
