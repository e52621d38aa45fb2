// Relevance scoring
//
// *Le Classement* (The Ranking) - Category, keyword, recency and popularity signals

use crate::content::ContentItem;
use crate::keywords::KeywordExtractor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Points awarded when both items share a category
pub const CATEGORY_WEIGHT: f64 = 30.0;

/// Points awarded when every keyword of the current item is shared
pub const KEYWORD_WEIGHT: f64 = 40.0;

/// Recency bands as (max age in days, points), checked in order
pub const RECENCY_BANDS: [(u64, f64); 3] = [(7, 20.0), (30, 15.0), (90, 10.0)];

/// Recency points for anything older than the last band
pub const RECENCY_FLOOR: f64 = 5.0;

/// Popularity bands as (views strictly above, points), checked in order
pub const POPULARITY_BANDS: [(u64, f64); 3] = [(1000, 10.0), (500, 7.0), (100, 5.0)];

/// Popularity points for anything at or below the last band
pub const POPULARITY_FLOOR: f64 = 2.0;

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Relevance of one candidate, with its per-signal breakdown
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RelevanceScore {
    /// Sum of all components (0 for the item itself)
    pub overall: f64,

    /// Category match component
    pub category: f64,

    /// Keyword overlap component
    pub keyword_overlap: f64,

    /// Recency component
    pub recency: f64,

    /// Popularity component
    pub popularity: f64,
}

impl RelevanceScore {
    /// Create a score from its components
    pub fn new(category: f64, keyword_overlap: f64, recency: f64, popularity: f64) -> Self {
        Self {
            overall: category + keyword_overlap + recency + popularity,
            category,
            keyword_overlap,
            recency,
            popularity,
        }
    }

    /// Get the overall score
    pub fn value(&self) -> f64 {
        self.overall
    }
}

/// Scores candidates against the item currently being read
#[derive(Debug, Clone, Default)]
pub struct RelevanceScorer {
    extractor: KeywordExtractor,
}

impl RelevanceScorer {
    /// Create a scorer using the default vocabulary
    pub fn new() -> Self {
        Self {
            extractor: KeywordExtractor::new(),
        }
    }

    /// Create a scorer with a custom keyword extractor
    pub fn with_extractor(extractor: KeywordExtractor) -> Self {
        Self { extractor }
    }

    /// Keyword extractor in use
    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    /// Score `candidate` relative to `current` as of `now`
    pub fn score(
        &self,
        current: &ContentItem,
        candidate: &ContentItem,
        now: DateTime<Utc>,
    ) -> RelevanceScore {
        let current_keywords = self.extractor.extract(current);
        self.score_with_keywords(current, &current_keywords, candidate, now)
    }

    /// Score with the current item's keywords already extracted.
    ///
    /// Used when ranking a whole pool so `current` is only analysed once.
    pub fn score_with_keywords(
        &self,
        current: &ContentItem,
        current_keywords: &BTreeSet<String>,
        candidate: &ContentItem,
        now: DateTime<Utc>,
    ) -> RelevanceScore {
        if candidate.id == current.id {
            return RelevanceScore::default();
        }

        let candidate_keywords = self.extractor.extract(candidate);

        RelevanceScore::new(
            category_component(current, candidate),
            keyword_overlap_component(current_keywords, &candidate_keywords),
            recency_component(candidate.published_at, now),
            popularity_component(candidate.view_count),
        )
    }
}

/// Category match: full weight on equality, nothing otherwise
pub fn category_component(current: &ContentItem, candidate: &ContentItem) -> f64 {
    if current.category == candidate.category {
        CATEGORY_WEIGHT
    } else {
        0.0
    }
}

/// Share of the current item's keywords that the candidate also has.
///
/// Normalised by the current side only, so the measure is directional.
pub fn keyword_overlap_component(
    current_keywords: &BTreeSet<String>,
    candidate_keywords: &BTreeSet<String>,
) -> f64 {
    let overlap = current_keywords.intersection(candidate_keywords).count();
    let denominator = current_keywords.len().max(1);
    KEYWORD_WEIGHT * overlap as f64 / denominator as f64
}

/// Banded recency points for a publication date
pub fn recency_component(published_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = days_between(published_at, now);
    RECENCY_BANDS
        .iter()
        .find(|(max_days, _)| days <= *max_days)
        .map(|(_, points)| *points)
        .unwrap_or(RECENCY_FLOOR)
}

/// Banded popularity points for a view count
pub fn popularity_component(view_count: u64) -> f64 {
    POPULARITY_BANDS
        .iter()
        .find(|(threshold, _)| view_count > *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(POPULARITY_FLOOR)
}

/// Absolute distance between two instants in whole days, partial days rounded up
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> u64 {
    let millis = (b - a).num_milliseconds().unsigned_abs();
    millis.div_ceil(MILLIS_PER_DAY)
}
