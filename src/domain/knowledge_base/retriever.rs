//! Retriever trait - the seam to the managed Retrieve API

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::RerankModel;
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// One call's worth of retrieval parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalRequest {
    /// Backing knowledge base ID
    pub knowledge_base_id: String,
    /// Query text sent downstream
    pub query: String,
    /// Number of results requested from the service
    pub number_of_results: u32,
    /// Request hybrid (vector + keyword) search
    pub hybrid: bool,
    /// Reranker to apply, if any
    pub rerank: Option<RerankModel>,
}

impl RetrievalRequest {
    pub fn new(
        knowledge_base_id: impl Into<String>,
        query: impl Into<String>,
        number_of_results: u32,
    ) -> Self {
        Self {
            knowledge_base_id: knowledge_base_id.into(),
            query: query.into(),
            number_of_results,
            hybrid: false,
            rerank: None,
        }
    }

    pub fn with_hybrid(mut self, hybrid: bool) -> Self {
        self.hybrid = hybrid;
        self
    }

    pub fn with_rerank(mut self, rerank: Option<RerankModel>) -> Self {
        self.rerank = rerank;
        self
    }
}

/// A raw chunk as returned by the retrieval backend
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub content: String,
    pub score: Option<f64>,
    pub source: Option<String>,
}

impl RetrievedChunk {
    pub fn new(content: impl Into<String>, score: f64, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            score: Some(score),
            source: Some(source.into()),
        }
    }
}

/// Backend that executes a retrieval against a knowledge base.
///
/// Each call corresponds to exactly one downstream request.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KnowledgeBaseRetriever: Send + Sync + Debug {
    /// Backend name used in logs and metrics
    fn provider_type(&self) -> &'static str;

    /// Run one retrieval
    async fn retrieve(&self, request: RetrievalRequest) -> Result<Vec<RetrievedChunk>, DomainError>;
}
