// Article persistence operations

use crate::error::{Result, StorageError};
use crate::schema::Storage;
use chrono::{DateTime, Utc};
use leconseil::{CandidateQuery, Category, ContentItem, ContentStore, ItemError, StoreError};
use rusqlite::{params, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const SELECT_COLUMNS: &str =
    "SELECT id, title, category, published_at, summary, body, view_count, is_featured FROM articles";

/// Raw article row before validation
#[derive(Debug, Clone)]
struct ArticleRow {
    id: String,
    title: String,
    category: String,
    published_at: i64,
    summary: Option<String>,
    body: Option<String>,
    view_count: i64,
    is_featured: bool,
}

impl ArticleRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            category: row.get(2)?,
            published_at: row.get(3)?,
            summary: row.get(4)?,
            body: row.get(5)?,
            view_count: row.get(6)?,
            is_featured: row.get(7)?,
        })
    }
}

impl TryFrom<ArticleRow> for ContentItem {
    type Error = ItemError;

    fn try_from(row: ArticleRow) -> std::result::Result<Self, Self::Error> {
        let category = Category::from_str_name(&row.category)
            .ok_or_else(|| ItemError::UnknownCategory(row.category.clone()))?;
        let view_count = u64::try_from(row.view_count).map_err(|_| ItemError::NegativeViewCount {
            id: row.id.clone(),
            value: row.view_count,
        })?;
        let published_at = DateTime::<Utc>::from_timestamp_millis(row.published_at).ok_or_else(
            || ItemError::InvalidTimestamp {
                id: row.id.clone(),
                millis: row.published_at,
            },
        )?;

        let item = ContentItem {
            id: row.id,
            title: row.title,
            category,
            published_at,
            summary: row.summary,
            body: row.body,
            view_count,
            is_featured: row.is_featured,
        };
        item.validate()?;
        Ok(item)
    }
}

fn to_sql_count(item: &ContentItem) -> std::result::Result<i64, ItemError> {
    i64::try_from(item.view_count).map_err(|_| ItemError::ViewCountOverflow {
        id: item.id.clone(),
        value: item.view_count,
    })
}

fn decode_rows(rows: Vec<ArticleRow>) -> Result<Vec<ContentItem>> {
    rows.into_iter()
        .map(|row| ContentItem::try_from(row).map_err(StorageError::from))
        .collect()
}

/// Article store for CRUD operations and candidate queries
pub struct ArticleStore {
    storage: Mutex<Storage>,
}

impl ArticleStore {
    /// Wrap an open storage
    pub fn new(storage: Storage) -> Self {
        Self {
            storage: Mutex::new(storage),
        }
    }

    /// Open an article store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Storage::open(path)?))
    }

    /// Open an in-memory article store
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Storage::open_in_memory()?))
    }

    fn storage(&self) -> Result<MutexGuard<'_, Storage>> {
        self.storage.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Insert a new article; fails if the id already exists
    pub fn insert(&self, item: &ContentItem) -> Result<()> {
        item.validate()?;
        let view_count = to_sql_count(item)?;
        let now = Utc::now().timestamp_millis();
        self.storage()?.conn().execute(
            "INSERT INTO articles (id, title, category, published_at, summary, body, view_count, is_featured, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                item.id,
                item.title,
                item.category.as_str(),
                item.published_at.timestamp_millis(),
                item.summary,
                item.body,
                view_count,
                item.is_featured,
                now,
                now,
            ],
        )?;
        Ok(())
    }

    /// Insert or replace an article.
    ///
    /// An existing view count is never lowered by an upsert.
    pub fn upsert(&self, item: &ContentItem) -> Result<()> {
        item.validate()?;
        let storage = self.storage()?;
        upsert_with(storage.conn(), item)
    }

    /// Upsert a batch of articles in one transaction
    pub fn batch_upsert(&self, items: &[ContentItem]) -> Result<usize> {
        for item in items {
            item.validate()?;
            to_sql_count(item)?;
        }

        let mut storage = self.storage()?;
        let tx = storage.conn_mut().transaction()?;
        for item in items {
            upsert_with(&tx, item)?;
        }
        tx.commit()?;

        info!("Stored {} article(s)", items.len());
        Ok(items.len())
    }

    /// Get an article by id
    pub fn get(&self, id: &str) -> Result<Option<ContentItem>> {
        let storage = self.storage()?;
        let row = storage
            .conn()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                ArticleRow::from_row,
            )
            .optional()?;

        row.map(|r| ContentItem::try_from(r).map_err(StorageError::from))
            .transpose()
    }

    /// Get an article by id, failing when it does not exist
    pub fn require(&self, id: &str) -> Result<ContentItem> {
        self.get(id)?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    /// Overwrite an existing article's fields
    pub fn update(&self, item: &ContentItem) -> Result<()> {
        item.validate()?;
        let view_count = to_sql_count(item)?;
        let changed = self.storage()?.conn().execute(
            "UPDATE articles
             SET title = ?2, category = ?3, published_at = ?4, summary = ?5, body = ?6,
                 view_count = ?7, is_featured = ?8, updated_at = ?9
             WHERE id = ?1",
            params![
                item.id,
                item.title,
                item.category.as_str(),
                item.published_at.timestamp_millis(),
                item.summary,
                item.body,
                view_count,
                item.is_featured,
                Utc::now().timestamp_millis(),
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::NotFound(item.id.clone()));
        }
        Ok(())
    }

    /// Delete an article, returning whether it existed
    pub fn delete(&self, id: &str) -> Result<bool> {
        let changed = self
            .storage()?
            .conn()
            .execute("DELETE FROM articles WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Number of stored articles
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .storage()?
            .conn()
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// The `limit` most recently published articles
    pub fn list_recent(&self, limit: usize) -> Result<Vec<ContentItem>> {
        self.query_recent(&CandidateQuery::recent(limit))
    }

    /// Articles matching a candidate query, newest first, ties by id
    pub fn query_recent(&self, query: &CandidateQuery) -> Result<Vec<ContentItem>> {
        let storage = self.storage()?;
        let mut stmt = storage.conn().prepare(&format!(
            "{SELECT_COLUMNS}
             WHERE (?1 IS NULL OR id != ?1) AND (?2 IS NULL OR category = ?2)
             ORDER BY published_at DESC, id ASC
             LIMIT ?3"
        ))?;

        let rows = stmt
            .query_map(
                params![
                    query.exclude_id.as_deref(),
                    query.category.map(|c| c.as_str()),
                    i64::try_from(query.limit).unwrap_or(i64::MAX),
                ],
                ArticleRow::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Candidate query {:?} matched {} row(s)", query, rows.len());
        decode_rows(rows)
    }

    /// Record one more view of an article and return the new count.
    ///
    /// This belongs to the reading flow; ranking never calls it.
    pub fn increment_view_count(&self, id: &str) -> Result<u64> {
        let count: Option<i64> = self
            .storage()?
            .conn()
            .query_row(
                "UPDATE articles SET view_count = view_count + 1, updated_at = ?2
                 WHERE id = ?1
                 RETURNING view_count",
                params![id, Utc::now().timestamp_millis()],
                |row| row.get(0),
            )
            .optional()?;

        match count {
            Some(value) => u64::try_from(value).map_err(|_| {
                StorageError::InvalidArticle(ItemError::NegativeViewCount {
                    id: id.to_string(),
                    value,
                })
            }),
            None => Err(StorageError::NotFound(id.to_string())),
        }
    }

    /// Checkpoint and release the database
    pub fn close(self) -> Result<()> {
        let mut storage = self
            .storage
            .into_inner()
            .map_err(|_| StorageError::LockPoisoned)?;
        storage.close()?;
        Ok(())
    }
}

fn upsert_with(conn: &rusqlite::Connection, item: &ContentItem) -> Result<()> {
    let view_count = to_sql_count(item)?;
    let now = Utc::now().timestamp_millis();
    conn.execute(
        "INSERT INTO articles (id, title, category, published_at, summary, body, view_count, is_featured, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
         ON CONFLICT(id) DO UPDATE SET
             title = excluded.title,
             category = excluded.category,
             published_at = excluded.published_at,
             summary = excluded.summary,
             body = excluded.body,
             view_count = MAX(articles.view_count, excluded.view_count),
             is_featured = excluded.is_featured,
             updated_at = excluded.updated_at",
        params![
            item.id,
            item.title,
            item.category.as_str(),
            item.published_at.timestamp_millis(),
            item.summary,
            item.body,
            view_count,
            item.is_featured,
            now,
        ],
    )?;
    Ok(())
}

impl ContentStore for ArticleStore {
    async fn fetch_recent(
        &self,
        query: &CandidateQuery,
    ) -> std::result::Result<Vec<ContentItem>, StoreError> {
        self.query_recent(query).map_err(StoreError::from)
    }
}
