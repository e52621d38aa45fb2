// Content model
//
// *Le Contenu* (The Content) - Articles and news entries read by the recommender

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Topical category of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Market and industry coverage
    #[serde(rename = "Industry News")]
    IndustryNews,
    /// Announcements about the company itself
    #[serde(rename = "Company News")]
    CompanyNews,
    /// Release notes and product announcements
    #[serde(rename = "Product Updates")]
    ProductUpdates,
    /// Regulation and government policy
    #[serde(rename = "Policy")]
    Policy,
    /// Customer case write-ups
    #[serde(rename = "Customer Stories")]
    CustomerStories,
    /// Trade shows, webinars and meetups
    #[serde(rename = "Events")]
    Events,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 6] = [
        Category::IndustryNews,
        Category::CompanyNews,
        Category::ProductUpdates,
        Category::Policy,
        Category::CustomerStories,
        Category::Events,
    ];

    /// Return the display string of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::IndustryNews => "Industry News",
            Category::CompanyNews => "Company News",
            Category::ProductUpdates => "Product Updates",
            Category::Policy => "Policy",
            Category::CustomerStories => "Customer Stories",
            Category::Events => "Events",
        }
    }

    /// Create a category from its display string.
    pub fn from_str_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One article or news entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Stable unique identifier
    pub id: String,

    /// Headline
    pub title: String,

    /// Topical category
    pub category: Category,

    /// Publication timestamp
    pub published_at: DateTime<Utc>,

    /// Short teaser text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Rich-text body (not used for ranking)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Number of times the article has been opened
    #[serde(default)]
    pub view_count: u64,

    /// Whether the article is pinned on the landing page
    #[serde(default)]
    pub is_featured: bool,
}

impl ContentItem {
    /// Create an item with no summary, no body and zero views
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: Category,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category,
            published_at,
            summary: None,
            body: None,
            view_count: 0,
            is_featured: false,
        }
    }

    /// Set the summary
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the view count
    pub fn with_view_count(mut self, view_count: u64) -> Self {
        self.view_count = view_count;
        self
    }

    /// Mark the item as featured
    pub fn featured(mut self) -> Self {
        self.is_featured = true;
        self
    }

    /// Check the invariants the type system does not enforce.
    ///
    /// Items coming from imports or storage are validated here, at the
    /// boundary, so the scorer can assume well-formed input.
    pub fn validate(&self) -> Result<(), ItemError> {
        if self.id.trim().is_empty() {
            return Err(ItemError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(ItemError::EmptyTitle {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// Invalid content item
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// Missing identifier
    #[error("content item has an empty id")]
    EmptyId,

    /// Missing headline
    #[error("content item {id} has an empty title")]
    EmptyTitle {
        /// Offending item id
        id: String,
    },

    /// Category string outside the known set
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Negative view count read from an external source
    #[error("content item {id} has a negative view count ({value})")]
    NegativeViewCount {
        /// Offending item id
        id: String,
        /// Raw value
        value: i64,
    },

    /// Stored publication time outside the representable range
    #[error("content item {id} has an out-of-range publication time ({millis} ms)")]
    InvalidTimestamp {
        /// Offending item id
        id: String,
        /// Raw unix milliseconds
        millis: i64,
    },

    /// View count too large for a signed 64-bit column
    #[error("content item {id} has a view count too large to store ({value})")]
    ViewCountOverflow {
        /// Offending item id
        id: String,
        /// Raw value
        value: u64,
    },
}

/// Candidate fetch parameters handed to a content store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateQuery {
    /// Item to leave out of the result (usually the one being read)
    pub exclude_id: Option<String>,

    /// Restrict candidates to one category
    pub category: Option<Category>,

    /// Maximum number of items to return
    pub limit: usize,
}

impl CandidateQuery {
    /// Query for the `limit` most recent items
    pub fn recent(limit: usize) -> Self {
        Self {
            exclude_id: None,
            category: None,
            limit,
        }
    }

    /// Exclude one item id
    pub fn excluding(mut self, id: impl Into<String>) -> Self {
        self.exclude_id = Some(id.into());
        self
    }

    /// Restrict to a category
    pub fn in_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Whether an item satisfies the id and category filters
    pub fn matches(&self, item: &ContentItem) -> bool {
        if self.exclude_id.as_deref() == Some(item.id.as_str()) {
            return false;
        }
        match self.category {
            Some(category) => item.category == category,
            None => true,
        }
    }
}
