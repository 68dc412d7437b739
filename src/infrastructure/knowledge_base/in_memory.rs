//! In-memory retriever for local development and testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::knowledge_base::{
    query_terms, KnowledgeBaseRetriever, RetrievalRequest, RetrievedChunk,
};
use crate::domain::DomainError;

/// A document seeded into the in-memory retriever
#[derive(Debug, Clone, Deserialize)]
pub struct InMemoryDocument {
    /// Backing knowledge base ID the document belongs to
    pub knowledge_base_id: String,
    pub content: String,
    pub source: String,
}

impl InMemoryDocument {
    pub fn new(
        knowledge_base_id: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            knowledge_base_id: knowledge_base_id.into(),
            content: content.into(),
            source: source.into(),
        }
    }
}

/// Retriever that scores documents by the share of query terms they contain.
///
/// Terms are those used for knowledge base selection, so Japanese queries
/// match through kanji and katakana bigrams.
#[derive(Debug, Default)]
pub struct InMemoryRetriever {
    documents: RwLock<HashMap<String, Vec<InMemoryDocument>>>,
    call_count: AtomicUsize,
}

impl InMemoryRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<InMemoryDocument>) -> Self {
        let mut by_kb: HashMap<String, Vec<InMemoryDocument>> = HashMap::new();

        for doc in documents {
            by_kb.entry(doc.knowledge_base_id.clone()).or_default().push(doc);
        }

        Self {
            documents: RwLock::new(by_kb),
            call_count: AtomicUsize::new(0),
        }
    }

    pub async fn add_document(&self, document: InMemoryDocument) {
        self.documents
            .write()
            .await
            .entry(document.knowledge_base_id.clone())
            .or_default()
            .push(document);
    }

    /// Number of retrievals performed so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KnowledgeBaseRetriever for InMemoryRetriever {
    fn provider_type(&self) -> &'static str {
        "in_memory"
    }

    async fn retrieve(&self, request: RetrievalRequest) -> Result<Vec<RetrievedChunk>, DomainError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let terms = query_terms(&request.query);

        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let documents = self.documents.read().await;
        let Some(docs) = documents.get(&request.knowledge_base_id) else {
            return Ok(Vec::new());
        };

        let mut chunks: Vec<RetrievedChunk> = docs
            .iter()
            .filter_map(|doc| {
                let content = doc.content.to_lowercase();
                let matched = terms.iter().filter(|t| content.contains(t.as_str())).count();

                (matched > 0).then(|| {
                    RetrievedChunk::new(
                        doc.content.clone(),
                        matched as f64 / terms.len() as f64,
                        doc.source.clone(),
                    )
                })
            })
            .collect();

        chunks.sort_by(|a, b| b.score.unwrap_or(0.0).total_cmp(&a.score.unwrap_or(0.0)));
        chunks.truncate(request.number_of_results as usize);

        Ok(chunks)
    }
}
