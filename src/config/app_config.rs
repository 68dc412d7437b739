use std::time::Duration;

use serde::Deserialize;

use crate::domain::knowledge_base::KnowledgeBaseDefinition;
use crate::infrastructure::knowledge_base::{InMemoryDocument, DEFAULT_TIMEOUT};
use crate::infrastructure::services::{SearchSettings, DEFAULT_MAX_SUB_QUERIES};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub bedrock: BedrockConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Knowledge bases in the order they are listed
    #[serde(default)]
    pub knowledge_bases: Vec<KnowledgeBaseDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which retriever serves searches
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RetrieverBackend {
    /// Bedrock Knowledge Bases `Retrieve`
    #[default]
    Bedrock,
    /// Documents from `bedrock.documents`, for local development
    InMemory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BedrockConfig {
    #[serde(default)]
    pub backend: RetrieverBackend,
    /// AWS region; the default provider chain is used when unset
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Seed documents for the in-memory backend
    #[serde(default)]
    pub documents: Vec<InMemoryDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub query_decomposition: bool,
    #[serde(default = "default_max_sub_queries")]
    pub max_sub_queries: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SelectionConfig {
    /// Knowledge base used by auto-search when nothing matches
    #[serde(default)]
    pub fallback: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GatewayConfig {
    /// Target name prefixed to advertised tool names
    #[serde(default)]
    pub target: Option<String>,
}

/// Span export and Prometheus exposition
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub tracing: TracingConfig,
    pub metrics: MetricsConfig,
}

/// OpenTelemetry span export; off unless an OTLP endpoint is configured
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// OTLP gRPC endpoint, e.g. `http://localhost:4317`
    pub otlp_endpoint: Option<String>,
    /// Share of traces sampled, 0.0 to 1.0
    pub sampling_ratio: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            sampling_ratio: 1.0,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_max_sub_queries() -> usize {
    DEFAULT_MAX_SUB_QUERIES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            backend: RetrieverBackend::default(),
            region: None,
            timeout_secs: default_timeout_secs(),
            documents: Vec::new(),
        }
    }
}

impl BedrockConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query_decomposition: false,
            max_sub_queries: default_max_sub_queries(),
        }
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            query_decomposition: config.query_decomposition,
            max_sub_queries: config.max_sub_queries,
        }
    }
}

impl AppConfig {
    /// Load `config/default`, then `config/local`, then `APP__*` environment
    /// variables (e.g. `APP__BEDROCK__REGION`)
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
