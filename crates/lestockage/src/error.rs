//! Storage error types.

use leconseil::{ItemError, StoreError};
use thiserror::Error;

/// Errors that can occur when working with article storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Article failed validation on the way in or out of the database
    #[error("Invalid article: {0}")]
    InvalidArticle(#[from] ItemError),

    /// No article with the given id
    #[error("Article not found: {0}")]
    NotFound(String),

    /// A previous holder of the connection lock panicked
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(e) => StoreError::QueryFailed(e.to_string()),
            StorageError::InvalidArticle(e) => StoreError::InvalidItem(e.to_string()),
            StorageError::NotFound(id) => StoreError::QueryFailed(format!("not found: {id}")),
            StorageError::LockPoisoned => StoreError::Unavailable("storage lock poisoned".into()),
        }
    }
}
