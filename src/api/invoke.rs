//! Function-style invocation endpoint

use axum::extract::State;
use serde_json::Value;

use super::state::AppState;
use super::types::Json;
use crate::infrastructure::services::InvocationResponse;

/// POST /invoke
///
/// Always answers 200; the outcome is carried by the envelope's `statusCode`.
pub async fn handle_invoke(
    State(state): State<AppState>,
    Json(event): Json<Value>,
) -> Json<InvocationResponse> {
    Json(state.dispatcher.handle_event(event).await)
}
