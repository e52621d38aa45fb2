// Error Handling
//
// *La Gestion des Erreurs* (The Error Management) - Error taxonomy for the bridge layer

use crate::config::ConfigError;
use leconseil::ItemError;
use lestockage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for LeConseil operations
pub type Result<T> = std::result::Result<T, ConseilError>;

/// LeConseil error types
#[derive(Debug, Error)]
pub enum ConseilError {
    /// Storage-related errors
    #[error("Storage error: {message}")]
    Storage {
        /// What went wrong
        message: String,
        /// Whether retrying might help
        recoverable: bool,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
        /// Hint for the user
        suggestion: Option<String>,
    },

    /// Validation errors on imported or stored articles
    #[error("Validation error: {message}")]
    Validation {
        /// What went wrong
        message: String,
        /// Hint for the user
        suggestion: Option<String>,
    },

    /// Unknown article id
    #[error("Article not found: {id}")]
    NotFound {
        /// Requested id
        id: String,
    },

    /// I/O errors with context
    #[error("I/O error: {context} (path: {path:?})")]
    Io {
        /// Operation being performed
        context: String,
        /// File involved, if any
        path: Option<PathBuf>,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failures
    #[error("Serialization error: {message}")]
    Serialization {
        /// What went wrong
        message: String,
    },
}

impl ConseilError {
    /// Create a storage error
    pub fn storage_error(message: impl Into<String>, recoverable: bool) -> Self {
        ConseilError::Storage {
            message: message.into(),
            recoverable,
        }
    }

    /// Create a config error
    pub fn config_error(message: impl Into<String>, suggestion: Option<String>) -> Self {
        ConseilError::Config {
            message: message.into(),
            suggestion,
        }
    }

    /// Create a validation error
    pub fn validation_error(message: impl Into<String>, suggestion: Option<String>) -> Self {
        ConseilError::Validation {
            message: message.into(),
            suggestion,
        }
    }

    /// Create a not-found error
    pub fn not_found(id: impl Into<String>) -> Self {
        ConseilError::NotFound { id: id.into() }
    }

    /// Create an I/O error with context
    pub fn io_error(
        context: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        ConseilError::Io {
            context: context.into(),
            path: Some(path.into()),
            source,
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            ConseilError::Storage { recoverable, .. } => *recoverable,
            ConseilError::Validation { .. } => true, // fix the input and retry
            ConseilError::NotFound { .. } => true,
            _ => false,
        }
    }

    /// Get user-friendly suggestion for recovery
    pub fn suggestion(&self) -> Option<String> {
        match self {
            ConseilError::Config { suggestion, .. } => suggestion.clone(),
            ConseilError::Validation { suggestion, .. } => suggestion.clone(),
            ConseilError::NotFound { .. } => {
                Some("Run 'leconseil list' to see stored article ids.".to_string())
            }
            ConseilError::Storage {
                recoverable: true, ..
            } => Some("Check that the database file is writable and retry.".to_string()),
            ConseilError::Serialization { .. } => Some(
                "Articles must be a JSON array of objects with id, title, category and publishedAt."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<StorageError> for ConseilError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => ConseilError::not_found(id),
            StorageError::InvalidArticle(e) => ConseilError::from(e),
            StorageError::Database(e) => ConseilError::storage_error(e.to_string(), true),
            StorageError::LockPoisoned => {
                ConseilError::storage_error("storage lock poisoned", false)
            }
        }
    }
}

impl From<ItemError> for ConseilError {
    fn from(err: ItemError) -> Self {
        let suggestion = match &err {
            ItemError::UnknownCategory(_) => Some(format!(
                "Use one of: {}",
                leconseil::Category::ALL
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            _ => None,
        };
        ConseilError::validation_error(err.to_string(), suggestion)
    }
}

impl From<ConfigError> for ConseilError {
    fn from(err: ConfigError) -> Self {
        ConseilError::config_error(
            err.to_string(),
            Some("Run 'leconseil config' to print the effective configuration.".to_string()),
        )
    }
}

impl From<serde_json::Error> for ConseilError {
    fn from(err: serde_json::Error) -> Self {
        ConseilError::Serialization {
            message: err.to_string(),
        }
    }
}
