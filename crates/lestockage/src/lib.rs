//! lestockage - Persistent Storage Layer
//!
//! *Le Stockage* (The Storage) - SQLite-backed article storage feeding the recommender

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Article CRUD, candidate queries and view counting.
pub mod articles;
/// Storage error types.
pub mod error;
/// Database schema and connection management.
pub mod schema;

pub use articles::ArticleStore;
pub use error::{Result, StorageError};
pub use schema::{Storage, StorageConfig};

/// Storage library initialization
pub fn init() {
    let _ = tracing::subscriber::set_default(tracing::subscriber::NoSubscriber::default());
}
