// leconseil - Core Orchestration
//
// *Le Conseil* (The Advice) - Unified API over article storage and the recommender

use crate::config::AppConfig;
use crate::errors::{ConseilError, Result};
use leconseil::{Clock, ContentItem, Recommendations, Recommender, SystemClock};
use lestockage::{ArticleStore, Storage, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// LeConseil - Main orchestration struct
///
/// Owns the article store and the effective configuration, and builds a
/// recommender over them for each request.
///
/// # Example
///
/// ```ignore
/// let conseil = LeConseil::open(AppConfig::default())?;
/// conseil.import_file("articles.json")?;
/// let related = conseil.recommend("erp-trends", None).await?;
/// ```
pub struct LeConseil<C = SystemClock> {
    /// Storage backend
    store: ArticleStore,

    /// Effective configuration
    config: AppConfig,

    /// Source of "now" for recency scoring
    clock: C,
}

/// Outcome of an import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Articles read from the input
    pub total: usize,

    /// Articles that did not exist before
    pub created: usize,

    /// Articles that replaced an existing id
    pub updated: usize,
}

impl LeConseil<SystemClock> {
    /// Open the database named by `config.storage`
    pub fn open(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let storage = Storage::from_config(config.storage.clone()).map_err(StorageError::from)?;
        info!("Opened article database at {}", config.storage.db_path);
        Ok(Self::with_store(ArticleStore::new(storage), config))
    }

    /// Open an in-memory database, ignoring `config.storage.db_path`
    pub fn open_in_memory(config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_store(ArticleStore::open_in_memory()?, config))
    }

    /// Wrap an already open store
    pub fn with_store(store: ArticleStore, config: AppConfig) -> Self {
        Self {
            store,
            config,
            clock: SystemClock,
        }
    }
}

impl<C: Clock + Clone> LeConseil<C> {
    /// Replace the clock used for recency scoring
    pub fn with_clock<C2: Clock + Clone>(self, clock: C2) -> LeConseil<C2> {
        LeConseil {
            store: self.store,
            config: self.config,
            clock,
        }
    }

    /// Effective configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Underlying article store
    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    /// Import a JSON array of articles from `path`
    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> Result<ImportSummary> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConseilError::io_error("reading import file", path, e))?;

        let items: Vec<ContentItem> = serde_json::from_str(&content)?;
        info!("Read {} article(s) from {}", items.len(), path.display());
        self.import_items(&items)
    }

    /// Validate and upsert a batch of articles.
    ///
    /// The whole batch is rejected when any article is invalid or an id
    /// appears twice.
    pub fn import_items(&self, items: &[ContentItem]) -> Result<ImportSummary> {
        let mut seen = HashSet::new();
        for item in items {
            item.validate()?;
            if !seen.insert(item.id.as_str()) {
                return Err(ConseilError::validation_error(
                    format!("duplicate article id {}", item.id),
                    Some("Each article in an import must have a unique id.".to_string()),
                ));
            }
        }

        let mut created = 0;
        for item in items {
            if self.store.get(&item.id)?.is_none() {
                created += 1;
            }
        }

        self.store.batch_upsert(items)?;

        Ok(ImportSummary {
            total: items.len(),
            created,
            updated: items.len() - created,
        })
    }

    /// Most recently published articles
    pub fn list(&self, limit: usize) -> Result<Vec<ContentItem>> {
        Ok(self.store.list_recent(limit)?)
    }

    /// One article by id
    pub fn show(&self, id: &str) -> Result<ContentItem> {
        Ok(self.store.require(id)?)
    }

    /// Articles related to the stored article `id`.
    ///
    /// `limit` defaults to `recommender.default_limit`. Reading recommendations
    /// never changes view counts.
    pub async fn recommend(&self, id: &str, limit: Option<usize>) -> Result<Recommendations> {
        let current = self.store.require(id)?;
        let limit = limit.unwrap_or(self.config.recommender.default_limit);

        let recommender = Recommender::new(&self.store)
            .with_clock(self.clock.clone())
            .with_scorer(self.config.recommender.scorer())
            .with_options(self.config.recommender.options());

        let ranked = recommender.recommend_ranked(&current, limit).await;
        debug!(
            "Recommended {} article(s) for {} from {:?}",
            ranked.len(),
            id,
            ranked.source
        );
        Ok(ranked)
    }

    /// Record that a reader opened `id`; returns the new view count
    pub fn record_view(&self, id: &str) -> Result<u64> {
        let views = self.store.increment_view_count(id)?;
        debug!("View recorded for {} ({} total)", id, views);
        Ok(views)
    }

    /// Delete an article
    pub fn delete(&self, id: &str) -> Result<()> {
        if self.store.delete(id)? {
            info!("Deleted article {}", id);
            Ok(())
        } else {
            Err(ConseilError::not_found(id))
        }
    }

    /// Number of stored articles
    pub fn count(&self) -> Result<usize> {
        Ok(self.store.count()?)
    }

    /// Checkpoint and close the database
    pub fn close(self) -> Result<()> {
        Ok(self.store.close()?)
    }
}
