//! Infrastructure services

mod knowledge_base_search_service;
mod tool_dispatcher;

pub use knowledge_base_search_service::{
    KnowledgeBaseSearchService, SearchSettings, DEFAULT_MAX_SUB_QUERIES,
};
pub use tool_dispatcher::{InvocationResponse, ToolDispatcher};
