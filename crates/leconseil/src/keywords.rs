// Keyword extraction
//
// *Les Mots-Clés* (The Keywords) - Vocabulary matching over titles and summaries

use crate::content::ContentItem;
use std::collections::BTreeSet;

/// Curated domain vocabulary used when no custom list is configured
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "ERP",
    "AI",
    "CRM",
    "MES",
    "SaaS",
    "IoT",
    "cloud",
    "digital transformation",
    "supply chain",
    "automation",
    "manufacturing",
    "inventory",
    "warehouse",
    "logistics",
    "procurement",
    "finance",
    "accounting",
    "payroll",
    "HR",
    "analytics",
    "data",
    "integration",
    "compliance",
    "retail",
    "mobile",
];

/// Extracts topical keywords from content items
///
/// A term matches when it occurs verbatim in the title or summary. There is
/// no tokenizing or case folding: `"AI"` matches `"AI-driven"` but not
/// `"ai-driven"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordExtractor {
    vocabulary: Vec<String>,
}

impl KeywordExtractor {
    /// Create an extractor over [`DEFAULT_VOCABULARY`]
    pub fn new() -> Self {
        Self::with_vocabulary(DEFAULT_VOCABULARY.iter().copied())
    }

    /// Create an extractor over a custom vocabulary
    pub fn with_vocabulary<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: terms
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    /// Vocabulary terms
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Keyword set of an item.
    ///
    /// Contains every vocabulary term found in the title or summary, plus
    /// the item's category name, which is always present.
    pub fn extract(&self, item: &ContentItem) -> BTreeSet<String> {
        let mut keywords = BTreeSet::new();

        self.collect_matches(&item.title, &mut keywords);
        keywords.insert(item.category.as_str().to_string());
        if let Some(summary) = &item.summary {
            self.collect_matches(summary, &mut keywords);
        }

        keywords
    }

    fn collect_matches(&self, text: &str, out: &mut BTreeSet<String>) {
        for term in &self.vocabulary {
            if text.contains(term.as_str()) {
                out.insert(term.clone());
            }
        }
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}
