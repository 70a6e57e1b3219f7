use thiserror::Error;

use crate::database::DatabaseError;
use crate::media::MediaError;

/// Fatal failures of a save or delete. Everything else ends up as a `SaveWarning`.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Persistence failed: {0}")]
    Persistence(DatabaseError),

    #[error("Upload failed: {0}")]
    Upload(#[from] MediaError),
}

impl From<DatabaseError> for ReconcileError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(msg) => ReconcileError::NotFound(msg),
            other => ReconcileError::Persistence(other),
        }
    }
}
