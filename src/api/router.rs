use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::middleware::{
    logging_middleware, metrics_middleware, security_headers_middleware, MAX_BODY_SIZE,
};
use super::state::AppState;
use super::{health, invoke, mcp, tools};
use crate::domain::tool::ToolName;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router: REST tools, the JSON-RPC tool endpoint, the
/// function-style invoke endpoint and health probes
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static(mcp::PROTOCOL_VERSION_HEADER),
            header::HeaderName::from_static(mcp::LEGACY_PROTOCOL_VERSION_HEADER),
        ])
        .expose_headers([header::HeaderName::from_static(mcp::PROTOCOL_VERSION_HEADER)]);

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .route(
            ToolName::ListKnowledgeBases.path(),
            post(tools::list_knowledge_bases),
        )
        .route(
            ToolName::SearchKnowledgeBase.path(),
            post(tools::search_knowledge_base),
        )
        .route(
            ToolName::AutoSearchKnowledgeBase.path(),
            post(tools::auto_search_knowledge_base),
        )
        .route("/mcp", post(mcp::handle_mcp))
        .route("/invoke", post(invoke::handle_invoke))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(cors);

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}
