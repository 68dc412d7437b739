//! REST endpoints, one per tool

use axum::extract::State;
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::tool::{
    AutoSearchKnowledgeBaseInput, AutoSearchKnowledgeBaseOutput, KnowledgeBaseList,
    SearchKnowledgeBaseInput, SearchKnowledgeBaseOutput,
};

/// POST /list-knowledge-bases
pub async fn list_knowledge_bases(State(state): State<AppState>) -> Json<KnowledgeBaseList> {
    debug!("Listing knowledge bases");

    Json(state.dispatcher.service().list_knowledge_bases())
}

/// POST /search-knowledge-base
pub async fn search_knowledge_base(
    State(state): State<AppState>,
    Json(input): Json<SearchKnowledgeBaseInput>,
) -> Result<Json<SearchKnowledgeBaseOutput>, ApiError> {
    debug!(kb_name = %input.kb_name, "Searching knowledge base");

    let request = input.into_request()?;
    let result = state.dispatcher.service().search(request).await?;

    Ok(Json(SearchKnowledgeBaseOutput { result }))
}

/// POST /auto-search-knowledge-base
pub async fn auto_search_knowledge_base(
    State(state): State<AppState>,
    Json(input): Json<AutoSearchKnowledgeBaseInput>,
) -> Result<Json<AutoSearchKnowledgeBaseOutput>, ApiError> {
    debug!("Auto-searching knowledge base");

    let request = input.into_request()?;
    let output = state.dispatcher.service().auto_search(request).await?;

    Ok(Json(output))
}
