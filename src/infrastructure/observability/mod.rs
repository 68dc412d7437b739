//! Observability infrastructure - tracing and metrics

mod metrics;
mod tracing_setup;

pub use metrics::{
    create_metrics_router, init_metrics, record_http_request, record_kb_retrieval,
    PrometheusMetrics, RetrievalMetricParams,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
