// Integration tests for related-content recommendation
//
// These tests drive the public API end to end: scoring properties over
// generated items, ordering and limits of the selector, and fallback
// behaviour when the content store misbehaves.

use chrono::{DateTime, Duration, TimeZone, Utc};
use leconseil::{
    CandidateQuery, Category, ContentItem, ContentStore, FixedClock, KeywordExtractor,
    MemoryContentStore, PoolSource, Recommender, RelevanceScorer, StoreError,
};
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 15, 9, 30, 0).unwrap()
}

fn article(id: &str, title: &str, category: Category, days_ago: i64, views: u64) -> ContentItem {
    ContentItem::new(id, title, category, now() - Duration::days(days_ago)).with_view_count(views)
}

struct UnreachableStore;

impl ContentStore for UnreachableStore {
    async fn fetch_recent(&self, _query: &CandidateQuery) -> Result<Vec<ContentItem>, StoreError> {
        Err(StoreError::Unavailable("backend timed out".to_string()))
    }
}

// ============================================================================
// END-TO-END
// ============================================================================

#[tokio::test]
async fn test_related_articles_end_to_end() {
    let a = article("A", "ERP digital transformation", Category::IndustryNews, 3, 1200);
    let b = article("B", "ERP selection guide", Category::IndustryNews, 5, 900);
    let c = article("C", "Unrelated topic", Category::Policy, 200, 10);

    let store = MemoryContentStore::new(vec![a.clone(), b.clone(), c.clone()]);
    let recommender = Recommender::new(store).with_clock(FixedClock(now()));

    let ranked = recommender.recommend_ranked(&a, 2).await;
    assert_eq!(ranked.source, PoolSource::Store);

    let scores: Vec<f64> = ranked.candidates.iter().map(|r| r.score.overall).collect();
    // B: 30 + 40 * 2/3 + 20 + 7, C: 0 + 0 + 5 + 2
    assert!((scores[0] - (57.0 + 80.0 / 3.0)).abs() < 1e-9);
    assert_eq!(scores[1], 7.0);

    assert_eq!(ranked.into_items(), vec![b, c]);
}

#[tokio::test]
async fn test_unreachable_store_still_recommends() {
    let current = article("A", "AI in the warehouse", Category::IndustryNews, 0, 0);
    let recommender = Recommender::new(UnreachableStore).with_clock(FixedClock(now()));

    let ranked = recommender.recommend_ranked(&current, 2).await;
    assert_eq!(ranked.source, PoolSource::Fallback);
    assert_eq!(ranked.len(), 2);
}

#[tokio::test]
async fn test_custom_vocabulary_changes_overlap() {
    let current = article("A", "Kanban boards", Category::ProductUpdates, 1, 0);
    let near = article("B", "Kanban for teams", Category::Events, 1, 0);
    let far = article("C", "Quarterly results", Category::Events, 1, 0);

    let store = MemoryContentStore::new(vec![far.clone(), near.clone()]);
    let scorer = RelevanceScorer::with_extractor(KeywordExtractor::with_vocabulary(["Kanban"]));
    let recommender = Recommender::new(store)
        .with_clock(FixedClock(now()))
        .with_scorer(scorer);

    let items = recommender.recommend(&current, 2).await;
    assert_eq!(items, vec![near, far]);
}

#[tokio::test]
async fn test_recommendation_does_not_touch_view_counts() {
    let current = article("A", "ERP", Category::IndustryNews, 0, 42);
    let candidate = article("B", "ERP", Category::IndustryNews, 0, 7);
    let store = MemoryContentStore::new(vec![candidate.clone()]);
    let recommender = Recommender::new(store).with_clock(FixedClock(now()));

    let first = recommender.recommend(&current, 1).await;
    let second = recommender.recommend(&current, 1).await;
    assert_eq!(first, second);
    assert_eq!(first[0].view_count, 7);
    assert_eq!(current.view_count, 42);
}

// ============================================================================
// PROPERTIES
// ============================================================================

const TITLES: &[&str] = &[
    "ERP digital transformation",
    "AI for supply chain planning",
    "Cloud payroll and HR",
    "Warehouse automation",
    "Gala dinner",
    "Retail analytics with ERP",
    "Compliance update",
    "",
];

fn arb_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn arb_item(id: String) -> impl Strategy<Value = ContentItem> {
    (
        prop::sample::select(TITLES.to_vec()),
        arb_category(),
        0i64..400,
        0u64..3000,
        prop::option::of(prop::sample::select(TITLES.to_vec())),
    )
        .prop_map(move |(title, category, days_ago, views, summary)| {
            let item = article(&id, title, category, days_ago, views);
            match summary {
                Some(s) => item.with_summary(s),
                None => item,
            }
        })
}

fn arb_pool() -> impl Strategy<Value = Vec<ContentItem>> {
    (0usize..12).prop_flat_map(|n| {
        (0..n)
            .map(|i| arb_item(format!("p{i}")))
            .collect::<Vec<_>>()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_self_score_is_zero(item in arb_item("x".to_string())) {
        let scorer = RelevanceScorer::new();
        prop_assert_eq!(scorer.score(&item, &item, now()).overall, 0.0);
    }

    #[test]
    fn prop_components_stay_in_bounds(
        current in arb_item("cur".to_string()),
        candidate in arb_item("cand".to_string()),
    ) {
        let scorer = RelevanceScorer::new();
        let score = scorer.score(&current, &candidate, now());

        prop_assert!(score.category == 0.0 || score.category == 30.0);
        prop_assert_eq!(score.category == 30.0, current.category == candidate.category);
        prop_assert!((0.0..=40.0).contains(&score.keyword_overlap));
        prop_assert!([20.0, 15.0, 10.0, 5.0].contains(&score.recency));
        prop_assert!([10.0, 7.0, 5.0, 2.0].contains(&score.popularity));
        prop_assert!((7.0..=100.0).contains(&score.overall));
    }

    #[test]
    fn prop_full_overlap_iff_keywords_subset(
        current in arb_item("cur".to_string()),
        candidate in arb_item("cand".to_string()),
    ) {
        let scorer = RelevanceScorer::new();
        let extractor = scorer.extractor();
        let subset = extractor.extract(&current).is_subset(&extractor.extract(&candidate));
        let score = scorer.score(&current, &candidate, now());
        prop_assert_eq!(score.keyword_overlap == 40.0, subset);
    }

    #[test]
    fn prop_ranking_is_sorted_limited_and_deterministic(
        current in arb_item("cur".to_string()),
        pool in arb_pool(),
        limit in 0usize..6,
    ) {
        let scorer = RelevanceScorer::new();
        let first = leconseil::rank_candidates(&scorer, &current, &pool, limit, now());
        let second = leconseil::rank_candidates(&scorer, &current, &pool, limit, now());

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), limit.min(pool.len()));
        for pair in first.windows(2) {
            prop_assert!(pair[0].score.overall >= pair[1].score.overall);
        }
    }
}
