//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, BedrockConfig, GatewayConfig, LogFormat, LoggingConfig, MetricsConfig,
    ObservabilityConfig, RetrieverBackend, SearchConfig, SelectionConfig, ServerConfig,
    TracingConfig,
};
