//! Search result shapes and merging

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Source reported when the Retrieve API returns no location
pub const UNKNOWN_SOURCE: &str = "unknown";

/// A single scored content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub content: String,
    pub score: f64,
    pub source: String,
}

impl SearchResultItem {
    /// Create an item, normalizing the score to a finite non-negative value
    pub fn new(content: impl Into<String>, score: f64, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            score: normalize_score(score),
            source: source.into(),
        }
    }
}

fn normalize_score(score: f64) -> f64 {
    if score.is_finite() && score > 0.0 {
        score
    } else {
        0.0
    }
}

/// Result of searching one knowledge base.
///
/// `count` always equals `results.len()`; it is derived on construction, and
/// the type is serialize-only so no other path can build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    kb_name: String,
    kb_description: String,
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_queries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords_extracted: Option<Vec<String>>,
    results: Vec<SearchResultItem>,
    count: usize,
    reranked: bool,
    hybrid_search: bool,
}

impl SearchResult {
    pub fn new(
        kb_name: impl Into<String>,
        kb_description: impl Into<String>,
        query: impl Into<String>,
        results: Vec<SearchResultItem>,
    ) -> Self {
        let count = results.len();

        Self {
            kb_name: kb_name.into(),
            kb_description: kb_description.into(),
            query: query.into(),
            sub_queries: None,
            keywords_extracted: None,
            results,
            count,
            reranked: false,
            hybrid_search: false,
        }
    }

    pub fn with_sub_queries(mut self, sub_queries: Vec<String>) -> Self {
        self.sub_queries = Some(sub_queries);
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords_extracted = Some(keywords);
        self
    }

    pub fn with_reranked(mut self, reranked: bool) -> Self {
        self.reranked = reranked;
        self
    }

    pub fn with_hybrid_search(mut self, hybrid_search: bool) -> Self {
        self.hybrid_search = hybrid_search;
        self
    }

    pub fn kb_name(&self) -> &str {
        &self.kb_name
    }

    pub fn kb_description(&self) -> &str {
        &self.kb_description
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sub_queries(&self) -> Option<&[String]> {
        self.sub_queries.as_deref()
    }

    pub fn keywords_extracted(&self) -> Option<&[String]> {
        self.keywords_extracted.as_deref()
    }

    pub fn results(&self) -> &[SearchResultItem] {
        &self.results
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn reranked(&self) -> bool {
        self.reranked
    }

    pub fn hybrid_search(&self) -> bool {
        self.hybrid_search
    }
}

/// Merge items from one or more retrievals.
///
/// Items sharing a source collapse to the highest-scoring one; the survivors
/// are ordered by descending score (ties keep first-seen order) and truncated
/// to `max_results`.
pub fn merge_results(items: Vec<SearchResultItem>, max_results: usize) -> Vec<SearchResultItem> {
    let mut best: Vec<SearchResultItem> = Vec::with_capacity(items.len());
    let mut index_by_source: HashMap<String, usize> = HashMap::new();

    for item in items {
        match index_by_source.get(&item.source) {
            Some(&idx) => {
                if item.score > best[idx].score {
                    best[idx] = item;
                }
            }
            None => {
                index_by_source.insert(item.source.clone(), best.len());
                best.push(item);
            }
        }
    }

    best.sort_by(|a, b| b.score.total_cmp(&a.score));
    best.truncate(max_results);
    best
}
