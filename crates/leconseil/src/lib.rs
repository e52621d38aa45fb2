// leconseil - Related Content
//
// *Le Conseil* (The Advice) - Relevance scoring and related-article recommendation

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Injectable wall-clock source.
pub mod clock;
/// Content items, categories and candidate queries.
pub mod content;
/// Built-in fallback pool.
pub mod fallback;
/// Vocabulary-based keyword extraction.
pub mod keywords;
/// Multi-signal relevance scoring.
pub mod ranking;
/// Top-N selection with fallback.
pub mod recommend;
/// Content store trait and in-memory implementation.
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use content::{CandidateQuery, Category, ContentItem, ItemError};
pub use fallback::default_fallback_pool;
pub use keywords::{KeywordExtractor, DEFAULT_VOCABULARY};
pub use ranking::{RelevanceScore, RelevanceScorer};
pub use recommend::{
    rank_candidates, PoolSource, RankedCandidate, Recommendations, Recommender,
    RecommenderOptions, DEFAULT_CANDIDATE_POOL_SIZE, DEFAULT_RECOMMENDATION_LIMIT,
};
pub use store::{ContentStore, MemoryContentStore, StoreError};

/// Recommender library initialization
pub fn init() {
    let _ = tracing::subscriber::set_default(tracing::subscriber::NoSubscriber::default());
}
