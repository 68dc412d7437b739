//! Knowledge Base domain - configuration, query shaping, selection and results

mod catalog;
mod entity;
mod query;
mod retriever;
mod search;
mod selection;
mod validation;

pub use catalog::KnowledgeBaseCatalog;
pub use entity::{KnowledgeBaseDefinition, KnowledgeBaseSummary, RerankModel};
pub use query::{enhance_query, extract_keywords, split_query};
pub use retriever::{KnowledgeBaseRetriever, RetrievalRequest, RetrievedChunk};
pub use search::{merge_results, SearchResult, SearchResultItem, UNKNOWN_SOURCE};
pub use selection::{query_terms, KeywordOverlapSelector, KnowledgeBaseSelector, Selection};
pub use validation::{
    validate_knowledge_base_name, validate_max_results, validate_query,
    KnowledgeBaseValidationError, DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT,
};

#[cfg(test)]
pub use retriever::MockKnowledgeBaseRetriever;
