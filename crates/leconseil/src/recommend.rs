// Recommendation selection
//
// *Le Conseil* (The Advice) - Top-N related content with a fallback pool

use crate::clock::{Clock, SystemClock};
use crate::content::{CandidateQuery, ContentItem};
use crate::fallback::default_fallback_pool;
use crate::ranking::{RelevanceScore, RelevanceScorer};
use crate::store::ContentStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of recommendations returned when the caller does not choose
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 2;

/// Number of recent items requested from the store per call
pub const DEFAULT_CANDIDATE_POOL_SIZE: usize = 10;

/// A candidate with its relevance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// 1-based position in the result
    pub rank: usize,

    /// Recommended item
    pub item: ContentItem,

    /// Relevance to the current item
    pub score: RelevanceScore,
}

/// Where a candidate pool came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolSource {
    /// Fetched from the content store
    Store,

    /// Built-in fallback pool
    Fallback,
}

/// Ranked recommendations for one current item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Origin of the candidate pool
    pub source: PoolSource,

    /// Candidates in descending score order
    pub candidates: Vec<RankedCandidate>,
}

impl Recommendations {
    /// Number of recommendations
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if nothing was recommended
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Drop the scores and keep the items in order
    pub fn into_items(self) -> Vec<ContentItem> {
        self.candidates.into_iter().map(|c| c.item).collect()
    }
}

/// Recommender settings
#[derive(Debug, Clone)]
pub struct RecommenderOptions {
    /// Limit used by [`Recommender::recommend_default`]
    pub default_limit: usize,

    /// Maximum number of candidates fetched from the store
    pub candidate_pool_size: usize,

    /// Only fetch candidates sharing the current item's category
    pub same_category_only: bool,

    /// Items ranked instead when the store fails or comes back empty
    pub fallback_pool: Vec<ContentItem>,
}

impl Default for RecommenderOptions {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_RECOMMENDATION_LIMIT,
            candidate_pool_size: DEFAULT_CANDIDATE_POOL_SIZE,
            same_category_only: false,
            fallback_pool: default_fallback_pool(),
        }
    }
}

/// Rank `pool` against `current` and keep the best `limit` entries.
///
/// The sort is stable, so equal scores keep their pool order. Candidates
/// sharing the current item's id are never returned.
pub fn rank_candidates(
    scorer: &RelevanceScorer,
    current: &ContentItem,
    pool: &[ContentItem],
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<RankedCandidate> {
    if limit == 0 || pool.is_empty() {
        return Vec::new();
    }

    let current_keywords = scorer.extractor().extract(current);

    let mut scored: Vec<(usize, RelevanceScore)> = pool
        .iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.id != current.id)
        .map(|(i, candidate)| {
            (
                i,
                scorer.score_with_keywords(current, &current_keywords, candidate, now),
            )
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.overall
            .partial_cmp(&a.1.overall)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(position, (i, score))| RankedCandidate {
            rank: position + 1,
            item: pool[i].clone(),
            score,
        })
        .collect()
}

/// Related-content recommender
///
/// Fetches a pool of recent candidates from a [`ContentStore`], scores each
/// one against the item being read and returns the most relevant. Store
/// failures and empty pools are absorbed by ranking the fallback pool
/// instead, so callers always get something to show.
pub struct Recommender<S, C = SystemClock> {
    store: S,
    clock: C,
    scorer: RelevanceScorer,
    options: RecommenderOptions,
}

impl<S: ContentStore> Recommender<S, SystemClock> {
    /// Create a recommender reading the system clock
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
            scorer: RelevanceScorer::new(),
            options: RecommenderOptions::default(),
        }
    }
}

impl<S: ContentStore, C: Clock> Recommender<S, C> {
    /// Replace the clock
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Recommender<S, C2> {
        Recommender {
            store: self.store,
            clock,
            scorer: self.scorer,
            options: self.options,
        }
    }

    /// Replace the scorer
    pub fn with_scorer(mut self, scorer: RelevanceScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Replace the options
    pub fn with_options(mut self, options: RecommenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Scorer in use
    pub fn scorer(&self) -> &RelevanceScorer {
        &self.scorer
    }

    /// Current options
    pub fn options(&self) -> &RecommenderOptions {
        &self.options
    }

    /// Up to `limit` items related to `current`, most relevant first
    pub async fn recommend(&self, current: &ContentItem, limit: usize) -> Vec<ContentItem> {
        self.recommend_ranked(current, limit).await.into_items()
    }

    /// [`Recommender::recommend`] with the configured default limit
    pub async fn recommend_default(&self, current: &ContentItem) -> Vec<ContentItem> {
        self.recommend(current, self.options.default_limit).await
    }

    /// Ranked recommendations with scores and pool origin
    pub async fn recommend_ranked(&self, current: &ContentItem, limit: usize) -> Recommendations {
        let (pool, source) = self.candidate_pool(current).await;
        let now = self.clock.now();
        let candidates = rank_candidates(&self.scorer, current, &pool, limit, now);

        debug!(
            "Ranked {} candidate(s) for {} from {:?}, returning {}",
            pool.len(),
            current.id,
            source,
            candidates.len()
        );

        Recommendations { source, candidates }
    }

    /// Candidate pool for `current`, falling back when the store has none
    pub async fn candidate_pool(&self, current: &ContentItem) -> (Vec<ContentItem>, PoolSource) {
        let mut query =
            CandidateQuery::recent(self.options.candidate_pool_size).excluding(current.id.clone());
        if self.options.same_category_only {
            query = query.in_category(current.category);
        }

        match self.store.fetch_recent(&query).await {
            Ok(mut items) => {
                // drop self-matches from stores that ignore exclude_id
                items.retain(|item| item.id != current.id);
                if !items.is_empty() {
                    return (items, PoolSource::Store);
                }
                debug!(
                    "Content store returned no candidates for {}, using fallback pool",
                    current.id
                );
                (self.fallback_pool(current), PoolSource::Fallback)
            }
            Err(err) => {
                warn!(
                    "Content store fetch failed for {}, using fallback pool: {}",
                    current.id, err
                );
                (self.fallback_pool(current), PoolSource::Fallback)
            }
        }
    }

    fn fallback_pool(&self, current: &ContentItem) -> Vec<ContentItem> {
        self.options
            .fallback_pool
            .iter()
            .filter(|item| item.id != current.id)
            .cloned()
            .collect()
    }
}
