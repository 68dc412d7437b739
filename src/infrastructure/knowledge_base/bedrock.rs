//! AWS Bedrock Knowledge Base retriever

use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::error::DisplayErrorContext;
use aws_sdk_bedrockagentruntime::types::{
    KnowledgeBaseQuery, KnowledgeBaseRetrievalConfiguration, KnowledgeBaseRetrievalResult,
    KnowledgeBaseVectorSearchConfiguration, SearchType, VectorSearchBedrockRerankingConfiguration,
    VectorSearchBedrockRerankingModelConfiguration, VectorSearchRerankingConfiguration,
    VectorSearchRerankingConfigurationType,
};
use aws_sdk_bedrockagentruntime::Client as BedrockAgentClient;
use tracing::debug;

use crate::domain::knowledge_base::{
    KnowledgeBaseRetriever, RerankModel, RetrievalRequest, RetrievedChunk,
};
use crate::domain::DomainError;

/// Region used when neither configuration nor the environment names one
pub const DEFAULT_REGION: &str = "ap-northeast-1";

/// Default bound on a single Retrieve call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Bedrock retriever
#[derive(Debug, Clone)]
pub struct BedrockRetrieverConfig {
    /// AWS region; falls back to the default provider chain
    pub region: Option<String>,
    /// Bound on each Retrieve call
    pub timeout: Duration,
}

impl Default for BedrockRetrieverConfig {
    fn default() -> Self {
        Self {
            region: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl BedrockRetrieverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Retriever backed by the Bedrock Agent Runtime `Retrieve` API
pub struct BedrockRetriever {
    client: BedrockAgentClient,
    region: String,
    timeout: Duration,
}

impl Debug for BedrockRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockRetriever")
            .field("region", &self.region)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BedrockRetriever {
    /// Create a retriever, loading AWS configuration from the environment
    pub async fn new(config: BedrockRetrieverConfig) -> Self {
        let aws_config = if let Some(region) = &config.region {
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(region.clone()))
                .load()
                .await
        } else {
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .load()
                .await
        };

        Self::with_config(&config, &aws_config)
    }

    /// Create with an existing AWS SDK config
    pub fn with_config(config: &BedrockRetrieverConfig, aws_config: &aws_config::SdkConfig) -> Self {
        let region = config
            .region
            .clone()
            .or_else(|| aws_config.region().map(|r| r.to_string()))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Self {
            client: BedrockAgentClient::new(aws_config),
            region,
            timeout: config.timeout,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

/// Build the retrieval configuration for one request: result count, hybrid
/// search override and optional reranking.
pub fn build_retrieval_configuration(
    request: &RetrievalRequest,
    region: &str,
) -> Result<KnowledgeBaseRetrievalConfiguration, DomainError> {
    let mut vector_config_builder = KnowledgeBaseVectorSearchConfiguration::builder()
        .number_of_results(request.number_of_results as i32);

    if request.hybrid {
        vector_config_builder = vector_config_builder.override_search_type(SearchType::Hybrid);
    }

    if let Some(model) = request.rerank {
        vector_config_builder =
            vector_config_builder.reranking_configuration(build_reranking(model, region)?);
    }

    Ok(KnowledgeBaseRetrievalConfiguration::builder()
        .vector_search_configuration(vector_config_builder.build())
        .build())
}

fn build_reranking(
    model: RerankModel,
    region: &str,
) -> Result<VectorSearchRerankingConfiguration, DomainError> {
    let build_error = |e: aws_sdk_bedrockagentruntime::error::BuildError| {
        DomainError::internal(format!("Failed to build reranking configuration: {}", e))
    };

    let model_config = VectorSearchBedrockRerankingModelConfiguration::builder()
        .model_arn(model.model_arn(region))
        .build()
        .map_err(build_error)?;

    let bedrock_config = VectorSearchBedrockRerankingConfiguration::builder()
        .model_configuration(model_config)
        .build();

    VectorSearchRerankingConfiguration::builder()
        .r#type(VectorSearchRerankingConfigurationType::BedrockRerankingModel)
        .bedrock_reranking_configuration(bedrock_config)
        .build()
        .map_err(build_error)
}

fn to_chunk(result: &KnowledgeBaseRetrievalResult) -> Option<RetrievedChunk> {
    let content = result.content()?.text().to_string();

    let source = result.location().and_then(|location| {
        location
            .s3_location()
            .and_then(|s3| s3.uri())
            .or_else(|| location.web_location().and_then(|web| web.url()))
            .map(str::to_string)
    });

    Some(RetrievedChunk {
        content,
        score: result.score(),
        source,
    })
}

/// Bound a downstream call; expiry becomes `DomainError::Timeout`
pub async fn with_timeout<F, T>(
    future: F,
    timeout: Duration,
    operation: impl Into<String>,
) -> Result<T, DomainError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(timeout, future)
        .await
        .map_err(|_| DomainError::timeout(operation, timeout.as_secs()))
}

#[async_trait]
impl KnowledgeBaseRetriever for BedrockRetriever {
    fn provider_type(&self) -> &'static str {
        "bedrock"
    }

    async fn retrieve(&self, request: RetrievalRequest) -> Result<Vec<RetrievedChunk>, DomainError> {
        let retrieval_config = build_retrieval_configuration(&request, &self.region)?;

        let query = KnowledgeBaseQuery::builder()
            .text(request.query.clone())
            .build();

        debug!(
            knowledge_base_id = %request.knowledge_base_id,
            number_of_results = request.number_of_results,
            hybrid = request.hybrid,
            rerank = ?request.rerank,
            "Calling Bedrock Retrieve"
        );

        let call = self
            .client
            .retrieve()
            .knowledge_base_id(&request.knowledge_base_id)
            .retrieval_query(query)
            .retrieval_configuration(retrieval_config)
            .send();

        let operation = format!("Retrieve from knowledge base '{}'", request.knowledge_base_id);
        let response = with_timeout(call, self.timeout, operation)
            .await?
            .map_err(|e| {
                DomainError::knowledge_base(format!(
                    "Bedrock Retrieve failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(response
            .retrieval_results()
            .iter()
            .filter_map(to_chunk)
            .collect())
    }
}
