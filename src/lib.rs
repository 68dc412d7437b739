//! Knowledge Base Search Gateway
//!
//! Exposes knowledge base search as agent tools:
//! - REST endpoints, one per tool
//! - A JSON-RPC tool endpoint for agent gateways
//! - Function-style event invocation
//!
//! Retrieval is delegated to Bedrock Knowledge Bases.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AppState, GatewaySettings};
use config::RetrieverBackend;
use domain::DomainError;
use domain::knowledge_base::{
    KeywordOverlapSelector, KnowledgeBaseCatalog, KnowledgeBaseRetriever,
};
use infrastructure::knowledge_base::{BedrockRetriever, BedrockRetrieverConfig, InMemoryRetriever};
use infrastructure::services::{KnowledgeBaseSearchService, SearchSettings, ToolDispatcher};
use tracing::{info, warn};

/// Build the catalog from the `[[knowledge_bases]]` entries of the configuration
pub fn build_catalog(config: &AppConfig) -> anyhow::Result<KnowledgeBaseCatalog> {
    Ok(KnowledgeBaseCatalog::new(config.knowledge_bases.clone())?)
}

/// Build the selector, checking that any fallback names a configured knowledge base
pub fn create_selector(
    config: &AppConfig,
    catalog: &KnowledgeBaseCatalog,
) -> anyhow::Result<KeywordOverlapSelector> {
    let selector = KeywordOverlapSelector::new();

    match config.selection.fallback.as_deref() {
        Some(name) if !catalog.contains(name) => Err(DomainError::configuration(format!(
            "selection.fallback '{}' is not a configured knowledge base",
            name
        ))
        .into()),
        Some(name) => Ok(selector.with_fallback(name)),
        None => Ok(selector),
    }
}

/// Create the retriever for the configured backend
pub async fn create_retriever(config: &AppConfig) -> Arc<dyn KnowledgeBaseRetriever> {
    match config.bedrock.backend {
        RetrieverBackend::Bedrock => {
            let mut retriever_config = BedrockRetrieverConfig::new().with_timeout(config.bedrock.timeout());

            if let Some(region) = &config.bedrock.region {
                retriever_config = retriever_config.with_region(region.clone());
            }

            let retriever = BedrockRetriever::new(retriever_config).await;
            info!(region = %retriever.region(), "Using Bedrock retriever");

            Arc::new(retriever)
        }
        RetrieverBackend::InMemory => {
            warn!(
                documents = config.bedrock.documents.len(),
                "Using in-memory retriever; results do not come from Bedrock"
            );

            Arc::new(InMemoryRetriever::with_documents(
                config.bedrock.documents.clone(),
            ))
        }
    }
}

/// Wire the catalog, retriever and selector into a dispatcher
pub async fn create_dispatcher(
    config: &AppConfig,
    catalog: KnowledgeBaseCatalog,
) -> anyhow::Result<Arc<ToolDispatcher>> {
    let selector = create_selector(config, &catalog)?;
    let retriever = create_retriever(config).await;

    info!(
        knowledge_bases = catalog.len(),
        provider = retriever.provider_type(),
        query_decomposition = config.search.query_decomposition,
        "Knowledge base search service initialized"
    );

    let service = KnowledgeBaseSearchService::new(Arc::new(catalog), retriever, Arc::new(selector))
        .with_settings(SearchSettings::from(&config.search));

    Ok(Arc::new(ToolDispatcher::new(Arc::new(service))))
}

/// Create the application state with all services initialized
pub async fn create_app_state(
    config: &AppConfig,
    catalog: KnowledgeBaseCatalog,
) -> anyhow::Result<AppState> {
    let dispatcher = create_dispatcher(config, catalog).await?;

    Ok(AppState::new(
        dispatcher,
        GatewaySettings {
            target: config.gateway.target.clone(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge_base::KnowledgeBaseDefinition;
    use crate::infrastructure::knowledge_base::InMemoryDocument;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.knowledge_bases = vec![
            KnowledgeBaseDefinition::new("product_docs", "JEBUX7Q8QN", "認証機能マニュアル"),
            KnowledgeBaseDefinition::new("faq", "2I5CHITSB5", "サンプルドキュメント"),
        ];
        config.bedrock.backend = RetrieverBackend::InMemory;
        config.bedrock.documents = vec![InMemoryDocument::new(
            "2I5CHITSB5",
            "Reset your password from the login page",
            "s3://faq/reset.md",
        )];
        config
    }

    #[test]
    fn test_build_catalog_preserves_order() {
        let catalog = build_catalog(&config()).unwrap();
        let names: Vec<&str> = catalog.iter().map(|kb| kb.name.as_str()).collect();

        assert_eq!(names, vec!["product_docs", "faq"]);
    }

    #[test]
    fn test_build_catalog_rejects_duplicates() {
        let mut config = config();
        config
            .knowledge_bases
            .push(KnowledgeBaseDefinition::new("faq", "OTHER", "dup"));

        assert!(build_catalog(&config).is_err());
    }

    #[test]
    fn test_selector_fallback_must_be_configured() {
        let mut config = config();
        let catalog = build_catalog(&config).unwrap();

        config.selection.fallback = Some("faq".to_string());
        assert_eq!(
            create_selector(&config, &catalog).unwrap().fallback(),
            Some("faq")
        );

        config.selection.fallback = Some("wiki".to_string());
        assert!(create_selector(&config, &catalog).is_err());
    }

    #[tokio::test]
    async fn test_create_app_state_with_in_memory_backend() {
        let config = config();
        let catalog = build_catalog(&config).unwrap();

        let state = create_app_state(&config, catalog).await.unwrap();
        assert_eq!(state.catalog().len(), 2);

        let response = state
            .dispatcher
            .handle_event(serde_json::json!({
                "action": "search",
                "kb_name": "faq",
                "query": "password"
            }))
            .await;

        assert_eq!(response.status_code, 200);
        let body = response.body_json().unwrap();
        assert_eq!(body["result"]["count"], 1);
    }
}
