// Storage schema and database management

use rusqlite::{Connection, Result as SqliteResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database path
    pub db_path: String,

    /// Whether to enable WAL mode
    pub wal_enabled: bool,

    /// Cache size in pages
    pub cache_size_pages: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "leconseil.db".to_string(),
            wal_enabled: true,
            cache_size_pages: Some(2000),
        }
    }
}

/// Main storage interface
pub struct Storage {
    conn: Connection,
    config: StorageConfig,
}

impl Storage {
    /// Open storage with default config
    pub fn open<P: AsRef<Path>>(path: P) -> SqliteResult<Self> {
        Self::open_with_config(path, StorageConfig::default())
    }

    /// Open storage at `config.db_path`
    pub fn from_config(config: StorageConfig) -> SqliteResult<Self> {
        let path = config.db_path.clone();
        Self::open_with_config(path, config)
    }

    /// Open storage with custom config
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: StorageConfig) -> SqliteResult<Self> {
        let conn = Connection::open(path)?;

        if config.wal_enabled {
            conn.pragma_update(None, "journal_mode", "WAL")?;
        }

        if let Some(cache_size) = config.cache_size_pages {
            conn.pragma_update(None, "cache_size", cache_size)?;
        }

        let mut storage = Self { conn, config };
        storage.initialize_schema()?;

        Ok(storage)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> SqliteResult<Self> {
        let config = StorageConfig {
            db_path: ":memory:".to_string(),
            wal_enabled: false,
            cache_size_pages: None,
        };
        let mut storage = Self {
            conn: Connection::open_in_memory()?,
            config,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Initialize database schema
    fn initialize_schema(&mut self) -> SqliteResult<()> {
        // published_at, created_at and updated_at hold unix milliseconds
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS articles (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                category TEXT NOT NULL,
                published_at INTEGER NOT NULL,
                summary TEXT,
                body TEXT,
                view_count INTEGER NOT NULL DEFAULT 0,
                is_featured INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        // Migration: is_featured was added after the first release
        let columns: Vec<String> = self
            .conn
            .prepare("PRAGMA table_info(articles)")?
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<SqliteResult<Vec<_>>>()?;

        if !columns.iter().any(|c| c == "is_featured") {
            self.conn.execute(
                "ALTER TABLE articles ADD COLUMN is_featured INTEGER NOT NULL DEFAULT 0",
                [],
            )?;
        }

        let indexes = [
            "CREATE INDEX IF NOT EXISTS idx_articles_published ON articles(published_at DESC)",
            "CREATE INDEX IF NOT EXISTS idx_articles_category ON articles(category, published_at DESC)",
        ];
        for index_sql in indexes {
            self.conn.execute(index_sql, [])?;
        }

        debug!("Article schema ready at {}", self.config.db_path);
        Ok(())
    }

    /// Get the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Get mutable connection
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Active configuration
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Checkpoint the WAL so the main database file is self-contained
    pub fn close(&mut self) -> SqliteResult<()> {
        if self.config.wal_enabled {
            self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().unwrap();
        let storage = Storage::open(temp_file.path());
        assert!(storage.is_ok());
    }

    #[test]
    fn test_schema_initialization() {
        let storage = Storage::open_in_memory().unwrap();

        let table_count: i64 = storage
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = 'articles'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_count, 1);

        let index_count: i64 = storage
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name LIKE 'idx_articles_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(index_count, 2);
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut first = Storage::open(temp_file.path()).unwrap();
        first.close().unwrap();
        drop(first);
        assert!(Storage::open(temp_file.path()).is_ok());
    }
}
