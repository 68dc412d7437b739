//! Tool arguments and their validated request forms

use serde::Deserialize;

use crate::domain::knowledge_base::{
    validate_max_results, validate_query, KnowledgeBaseValidationError,
};

/// Arguments of `ListKnowledgeBases` (none; unknown fields are ignored)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListKnowledgeBasesInput {}

/// Arguments of `SearchKnowledgeBase`.
///
/// Missing strings deserialize as empty so validation reports them by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchKnowledgeBaseInput {
    #[serde(default, alias = "kb_name")]
    pub kb_name: String,
    #[serde(default)]
    pub query: String,
    #[serde(default, alias = "max_results")]
    pub max_results: Option<i64>,
}

/// Arguments of `AutoSearchKnowledgeBase`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSearchKnowledgeBaseInput {
    #[serde(default)]
    pub query: String,
    #[serde(default, alias = "max_results")]
    pub max_results: Option<i64>,
}

/// Validated search against a named knowledge base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub kb_name: String,
    pub query: String,
    pub max_results: u32,
}

/// Validated search against an automatically selected knowledge base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoSearchRequest {
    pub query: String,
    pub max_results: u32,
}

impl SearchKnowledgeBaseInput {
    pub fn new(kb_name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            kb_name: kb_name.into(),
            query: query.into(),
            max_results: None,
        }
    }

    pub fn with_max_results(mut self, max_results: i64) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Check argument shapes. Whether the knowledge base exists is checked
    /// against the catalog by the service.
    pub fn into_request(self) -> Result<SearchRequest, KnowledgeBaseValidationError> {
        let kb_name = self.kb_name.trim();

        if kb_name.is_empty() {
            return Err(KnowledgeBaseValidationError::EmptyName);
        }

        let query = validate_query(&self.query)?;
        let max_results = validate_max_results(self.max_results)?;

        Ok(SearchRequest {
            kb_name: kb_name.to_string(),
            query: query.to_string(),
            max_results,
        })
    }
}

impl AutoSearchKnowledgeBaseInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: None,
        }
    }

    pub fn with_max_results(mut self, max_results: i64) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn into_request(self) -> Result<AutoSearchRequest, KnowledgeBaseValidationError> {
        let query = validate_query(&self.query)?;
        let max_results = validate_max_results(self.max_results)?;

        Ok(AutoSearchRequest {
            query: query.to_string(),
            max_results,
        })
    }
}
