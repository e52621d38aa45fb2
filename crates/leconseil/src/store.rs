// Content store boundary
//
// *La Source* (The Source) - Where candidate pools come from

use crate::content::{CandidateQuery, ContentItem};
use std::cmp::Reverse;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by a content store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Backend answered but the query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored row could not be turned into a content item
    #[error("Invalid item: {0}")]
    InvalidItem(String),
}

/// Source of recommendation candidates
pub trait ContentStore: Send + Sync {
    /// Fetch up to `query.limit` items, most recently published first,
    /// honouring the id exclusion and category filter.
    fn fetch_recent(
        &self,
        query: &CandidateQuery,
    ) -> impl Future<Output = Result<Vec<ContentItem>, StoreError>> + Send;
}

impl<T: ContentStore + ?Sized> ContentStore for Arc<T> {
    fn fetch_recent(
        &self,
        query: &CandidateQuery,
    ) -> impl Future<Output = Result<Vec<ContentItem>, StoreError>> + Send {
        (**self).fetch_recent(query)
    }
}

impl<T: ContentStore + ?Sized> ContentStore for &T {
    fn fetch_recent(
        &self,
        query: &CandidateQuery,
    ) -> impl Future<Output = Result<Vec<ContentItem>, StoreError>> + Send {
        (**self).fetch_recent(query)
    }
}

/// In-memory content store over a fixed snapshot
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    items: Vec<ContentItem>,
}

impl MemoryContentStore {
    /// Create a store holding `items`
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    /// Add an item
    pub fn insert(&mut self, item: ContentItem) {
        self.items.push(item);
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the store holds nothing
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items matching `query`, newest first, ties broken by id
    pub fn query(&self, query: &CandidateQuery) -> Vec<ContentItem> {
        let mut matching: Vec<&ContentItem> =
            self.items.iter().filter(|item| query.matches(item)).collect();
        matching.sort_by_key(|item| (Reverse(item.published_at), item.id.clone()));
        matching.into_iter().take(query.limit).cloned().collect()
    }
}

impl ContentStore for MemoryContentStore {
    async fn fetch_recent(&self, query: &CandidateQuery) -> Result<Vec<ContentItem>, StoreError> {
        Ok(self.query(query))
    }
}
