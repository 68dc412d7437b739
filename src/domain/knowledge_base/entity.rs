//! Knowledge base entity and related types

use serde::{Deserialize, Serialize};

use super::validation::{validate_knowledge_base_name, KnowledgeBaseValidationError};

/// Reranking model applied by the Retrieve API after vector search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RerankModel {
    #[default]
    Amazon,
    Cohere,
}

impl RerankModel {
    /// Foundation model identifier of the reranker
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Amazon => "amazon.rerank-v1:0",
            Self::Cohere => "cohere.rerank-v3-5:0",
        }
    }

    /// Foundation model ARN of the reranker in the given region
    pub fn model_arn(&self, region: &str) -> String {
        format!(
            "arn:aws:bedrock:{}::foundation-model/{}",
            region,
            self.model_id()
        )
    }
}

impl std::fmt::Display for RerankModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Amazon => write!(f, "amazon"),
            Self::Cohere => write!(f, "cohere"),
        }
    }
}

/// A configured knowledge base, as read from `[[knowledge_bases]]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseDefinition {
    /// Name callers use to address the knowledge base
    pub name: String,
    /// Backing Bedrock knowledge base ID
    pub id: String,
    /// What the knowledge base contains
    pub description: String,
    /// Whether to rerank retrieval results
    #[serde(default)]
    pub rerank: bool,
    /// Reranker used when `rerank` is set
    #[serde(default)]
    pub rerank_model: RerankModel,
    /// Whether to request hybrid (vector + keyword) search
    #[serde(default)]
    pub hybrid: bool,
    /// Extra terms that steer automatic selection toward this knowledge base
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl KnowledgeBaseDefinition {
    /// Create a definition with reranking and hybrid search disabled
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            description: description.into(),
            rerank: false,
            rerank_model: RerankModel::default(),
            hybrid: false,
            keywords: Vec::new(),
        }
    }

    pub fn with_rerank(mut self, model: RerankModel) -> Self {
        self.rerank = true;
        self.rerank_model = model;
        self
    }

    pub fn with_hybrid(mut self, hybrid: bool) -> Self {
        self.hybrid = hybrid;
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Reranker to use, if reranking is enabled
    pub fn reranker(&self) -> Option<RerankModel> {
        self.rerank.then_some(self.rerank_model)
    }

    /// Check the definition is usable
    pub fn validate(&self) -> Result<(), KnowledgeBaseValidationError> {
        validate_knowledge_base_name(&self.name)
    }

    pub fn summary(&self) -> KnowledgeBaseSummary {
        KnowledgeBaseSummary {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Public view of a knowledge base returned by `ListKnowledgeBases`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseSummary {
    pub name: String,
    pub description: String,
}
