//! Knowledge base search service - validation, selection, retrieval and merging

use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::domain::knowledge_base::{
    enhance_query, extract_keywords, merge_results, split_query, KnowledgeBaseCatalog,
    KnowledgeBaseDefinition, KnowledgeBaseRetriever, KnowledgeBaseSelector, RetrievalRequest,
    RetrievedChunk, SearchResult, SearchResultItem, MAX_RESULTS_LIMIT, UNKNOWN_SOURCE,
};
use crate::domain::tool::{
    AutoSearchKnowledgeBaseOutput, AutoSearchRequest, KnowledgeBaseList, SearchRequest,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_kb_retrieval, RetrievalMetricParams};

/// Default cap on sub-queries when decomposition is enabled
pub const DEFAULT_MAX_SUB_QUERIES: usize = 3;

/// Query shaping settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Split long queries and retrieve once per fragment
    pub query_decomposition: bool,
    /// Upper bound on fragments retrieved per search
    pub max_sub_queries: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            query_decomposition: false,
            max_sub_queries: DEFAULT_MAX_SUB_QUERIES,
        }
    }
}

/// Runs the three knowledge base operations against a static catalog
pub struct KnowledgeBaseSearchService {
    catalog: Arc<KnowledgeBaseCatalog>,
    retriever: Arc<dyn KnowledgeBaseRetriever>,
    selector: Arc<dyn KnowledgeBaseSelector>,
    settings: SearchSettings,
}

impl std::fmt::Debug for KnowledgeBaseSearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBaseSearchService")
            .field("knowledge_bases", &self.catalog.len())
            .field("provider", &self.retriever.provider_type())
            .field("settings", &self.settings)
            .finish()
    }
}

impl KnowledgeBaseSearchService {
    pub fn new(
        catalog: Arc<KnowledgeBaseCatalog>,
        retriever: Arc<dyn KnowledgeBaseRetriever>,
        selector: Arc<dyn KnowledgeBaseSelector>,
    ) -> Self {
        Self {
            catalog,
            retriever,
            selector,
            settings: SearchSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn catalog(&self) -> &KnowledgeBaseCatalog {
        &self.catalog
    }

    /// List configured knowledge bases in configuration order
    pub fn list_knowledge_bases(&self) -> KnowledgeBaseList {
        KnowledgeBaseList {
            knowledge_bases: self.catalog.summaries(),
        }
    }

    /// Search a named knowledge base
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResult, DomainError> {
        let kb = self.catalog.require(&request.kb_name)?;

        self.search_in(kb, &request.query, request.max_results).await
    }

    /// Select the best-matching knowledge base for the query, then search it
    pub async fn auto_search(
        &self,
        request: AutoSearchRequest,
    ) -> Result<AutoSearchKnowledgeBaseOutput, DomainError> {
        let selection = self.selector.select(&request.query, &self.catalog)?;
        let kb = self.catalog.require(&selection.name)?;

        info!(
            kb_name = %kb.name,
            score = selection.score,
            "Selected knowledge base"
        );

        let result = self.search_in(kb, &request.query, request.max_results).await?;

        Ok(AutoSearchKnowledgeBaseOutput {
            selected_kb: selection.name,
            selection_score: selection.score,
            result,
        })
    }

    async fn search_in(
        &self,
        kb: &KnowledgeBaseDefinition,
        query: &str,
        max_results: u32,
    ) -> Result<SearchResult, DomainError> {
        let keywords = extract_keywords(query);
        let sub_queries: Vec<String> = self
            .sub_queries(query)
            .iter()
            .map(|sub_query| enhance_query(sub_query, &keywords))
            .collect();

        let number_of_results = max_results.saturating_mul(2).min(MAX_RESULTS_LIMIT);

        debug!(
            kb_name = %kb.name,
            sub_queries = sub_queries.len(),
            keywords = ?keywords,
            number_of_results,
            "Searching knowledge base"
        );

        let retrievals = sub_queries.iter().map(|sub_query| {
            let request = RetrievalRequest::new(&kb.id, sub_query.clone(), number_of_results)
                .with_hybrid(kb.hybrid)
                .with_rerank(kb.reranker());

            self.retrieve(kb, request)
        });

        let items = try_join_all(retrievals)
            .await?
            .into_iter()
            .flatten()
            .map(to_item)
            .collect();

        let results = merge_results(items, max_results as usize);

        Ok(SearchResult::new(&kb.name, &kb.description, query, results)
            .with_sub_queries(sub_queries)
            .with_keywords(keywords)
            .with_reranked(kb.rerank)
            .with_hybrid_search(kb.hybrid))
    }

    fn sub_queries(&self, query: &str) -> Vec<String> {
        if !self.settings.query_decomposition {
            return vec![query.to_string()];
        }

        split_query(query)
            .into_iter()
            .take(self.settings.max_sub_queries.max(1))
            .collect()
    }

    async fn retrieve(
        &self,
        kb: &KnowledgeBaseDefinition,
        request: RetrievalRequest,
    ) -> Result<Vec<RetrievedChunk>, DomainError> {
        let start = Instant::now();
        let result = self.retriever.retrieve(request).await;

        record_kb_retrieval(RetrievalMetricParams {
            provider: self.retriever.provider_type(),
            kb_name: &kb.name,
            duration: start.elapsed(),
            success: result.is_ok(),
            result_count: result.as_ref().map(Vec::len).unwrap_or(0),
        });

        if let Err(e) = &result {
            warn!(kb_name = %kb.name, error = %e, "Knowledge base retrieval failed");
        }

        result
    }
}

fn to_item(chunk: RetrievedChunk) -> SearchResultItem {
    SearchResultItem::new(
        chunk.content,
        chunk.score.unwrap_or(0.0),
        chunk.source.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
    )
}
