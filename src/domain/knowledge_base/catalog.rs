//! Static catalog of configured knowledge bases

use std::collections::HashSet;

use serde::Deserialize;

use super::entity::{KnowledgeBaseDefinition, KnowledgeBaseSummary};
use super::validation::KnowledgeBaseValidationError;
use crate::domain::error::DomainError;

/// Immutable, ordered set of knowledge bases loaded once at startup.
///
/// Order follows the configuration file, so listing is stable across calls.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBaseCatalog {
    entries: Vec<KnowledgeBaseDefinition>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    knowledge_bases: Vec<KnowledgeBaseDefinition>,
}

impl KnowledgeBaseCatalog {
    /// Build a catalog, rejecting malformed or duplicate entries
    pub fn new(entries: Vec<KnowledgeBaseDefinition>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();

        for entry in &entries {
            entry.validate().map_err(|e| {
                DomainError::configuration(format!("Invalid knowledge base entry: {}", e))
            })?;

            if entry.id.trim().is_empty() {
                return Err(DomainError::configuration(format!(
                    "Knowledge base '{}' has no backing id",
                    entry.name
                )));
            }

            if !seen.insert(entry.name.as_str()) {
                return Err(DomainError::configuration(format!(
                    "Duplicate knowledge base name '{}'",
                    entry.name
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Parse a standalone catalog file containing `[[knowledge_bases]]` tables
    pub fn from_toml_str(content: &str) -> Result<Self, DomainError> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| {
            DomainError::configuration(format!("Failed to parse knowledge base catalog: {}", e))
        })?;

        Self::new(file.knowledge_bases)
    }

    pub fn get(&self, name: &str) -> Option<&KnowledgeBaseDefinition> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Look up a knowledge base by name, failing validation when it is unknown
    pub fn require(
        &self,
        name: &str,
    ) -> Result<&KnowledgeBaseDefinition, KnowledgeBaseValidationError> {
        if name.is_empty() {
            return Err(KnowledgeBaseValidationError::EmptyName);
        }

        self.get(name)
            .ok_or_else(|| KnowledgeBaseValidationError::UnknownKnowledgeBase {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnowledgeBaseDefinition> {
        self.entries.iter()
    }

    pub fn summaries(&self) -> Vec<KnowledgeBaseSummary> {
        self.entries.iter().map(KnowledgeBaseDefinition::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge_base::RerankModel;

    fn sample_catalog() -> KnowledgeBaseCatalog {
        KnowledgeBaseCatalog::new(vec![
            KnowledgeBaseDefinition::new("product_docs", "JEBUX7Q8QN", "認証機能マニュアル"),
            KnowledgeBaseDefinition::new("faq", "2I5CHITSB5", "サンプルドキュメント"),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let catalog = sample_catalog();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("faq"));
        assert_eq!(catalog.get("product_docs").unwrap().id, "JEBUX7Q8QN");
        assert!(catalog.get("internal_wiki").is_none());
    }

    #[test]
    fn test_require_unknown_and_empty() {
        let catalog = sample_catalog();

        assert!(matches!(
            catalog.require(""),
            Err(KnowledgeBaseValidationError::EmptyName)
        ));
        assert!(matches!(
            catalog.require("internal_wiki"),
            Err(KnowledgeBaseValidationError::UnknownKnowledgeBase { .. })
        ));
        assert!(catalog.require("faq").is_ok());
    }

    #[test]
    fn test_summaries_are_order_stable() {
        let catalog = sample_catalog();

        let first: Vec<String> = catalog.summaries().into_iter().map(|s| s.name).collect();
        let second: Vec<String> = catalog.summaries().into_iter().map(|s| s.name).collect();

        assert_eq!(first, vec!["product_docs", "faq"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_duplicates() {
        let result = KnowledgeBaseCatalog::new(vec![
            KnowledgeBaseDefinition::new("faq", "A", "first"),
            KnowledgeBaseDefinition::new("faq", "B", "second"),
        ]);

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_rejects_missing_backing_id() {
        let result =
            KnowledgeBaseCatalog::new(vec![KnowledgeBaseDefinition::new("faq", "  ", "FAQ")]);

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_rejects_malformed_name() {
        let result =
            KnowledgeBaseCatalog::new(vec![KnowledgeBaseDefinition::new("Product Docs", "A", "")]);

        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_str() {
        let catalog = KnowledgeBaseCatalog::from_toml_str(
            r#"
            [[knowledge_bases]]
            name = "product_docs"
            id = "JEBUX7Q8QN"
            description = "認証機能マニュアル"
            rerank = true
            rerank_model = "cohere"
            keywords = ["認証", "login"]

            [[knowledge_bases]]
            name = "faq"
            id = "2I5CHITSB5"
            description = "サンプルドキュメント"
            hybrid = true
            "#,
        )
        .unwrap();

        let docs = catalog.get("product_docs").unwrap();
        assert_eq!(docs.reranker(), Some(RerankModel::Cohere));
        assert_eq!(docs.keywords, vec!["認証", "login"]);
        assert!(catalog.get("faq").unwrap().hybrid);
        assert_eq!(catalog.iter().next().unwrap().name, "product_docs");
    }

    #[test]
    fn test_from_toml_str_invalid() {
        assert!(KnowledgeBaseCatalog::from_toml_str("knowledge_bases = 3").is_err());
    }
}
