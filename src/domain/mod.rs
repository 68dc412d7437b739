//! Domain layer - knowledge base model, query shaping and the tool surface

pub mod error;
pub mod knowledge_base;
pub mod tool;

pub use error::DomainError;
pub use knowledge_base::{
    KnowledgeBaseCatalog, KnowledgeBaseDefinition, KnowledgeBaseRetriever,
    KnowledgeBaseSelector, KnowledgeBaseSummary, KnowledgeBaseValidationError, RerankModel,
    SearchResult, SearchResultItem,
};
pub use tool::{ToolName, ToolOutput};
