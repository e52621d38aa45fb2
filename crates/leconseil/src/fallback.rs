// Built-in sample articles served when the content store has nothing to offer

use crate::content::{Category, ContentItem};
use chrono::{DateTime, Utc};

fn published(unix_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(unix_seconds, 0).unwrap_or_default()
}

/// Default fallback pool
pub fn default_fallback_pool() -> Vec<ContentItem> {
    vec![
        ContentItem::new(
            "fallback-erp-trends",
            "Five ERP trends reshaping manufacturing",
            Category::IndustryNews,
            published(1_714_521_600), // 2024-05-01
        )
        .with_summary("How cloud deployment and automation change the factory floor")
        .with_view_count(1280),
        ContentItem::new(
            "fallback-supply-chain",
            "Building a resilient supply chain with ERP",
            Category::IndustryNews,
            published(1_711_929_600), // 2024-04-01
        )
        .with_summary("Inventory visibility and procurement analytics in one place")
        .with_view_count(640),
        ContentItem::new(
            "fallback-release",
            "Spring release: AI-assisted finance close",
            Category::ProductUpdates,
            published(1_709_251_200), // 2024-03-01
        )
        .with_summary("New accounting automation and mobile approvals")
        .with_view_count(310),
        ContentItem::new(
            "fallback-customer",
            "How a retail chain unified warehouse and logistics data",
            Category::CustomerStories,
            published(1_706_745_600), // 2024-02-01
        )
        .with_summary("A digital transformation story from store shelf to HR")
        .with_view_count(95),
    ]
}
