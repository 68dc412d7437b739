//! Tool dispatcher - maps a tool name plus JSON arguments onto the search service

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info_span, warn, Instrument};

use super::knowledge_base_search_service::KnowledgeBaseSearchService;
use crate::domain::tool::{
    AutoSearchKnowledgeBaseInput, ListKnowledgeBasesInput, SearchKnowledgeBaseInput,
    SearchKnowledgeBaseOutput, ToolName, ToolOutput,
};
use crate::domain::DomainError;

/// Action assumed by legacy events that carry none
const DEFAULT_LEGACY_ACTION: &str = "search";

/// Function-style response envelope; `body` holds serialized JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    fn ok(output: &ToolOutput) -> Self {
        Self {
            status_code: 200,
            body: output.to_value().to_string(),
        }
    }

    fn from_error(err: &DomainError) -> Self {
        Self {
            status_code: if err.is_client_error() { 400 } else { 500 },
            body: json!({ "message": err.message() }).to_string(),
        }
    }

    /// Parse the body back into JSON
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Routes tool invocations from every transport to the search service
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    service: Arc<KnowledgeBaseSearchService>,
}

impl ToolDispatcher {
    pub fn new(service: Arc<KnowledgeBaseSearchService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &KnowledgeBaseSearchService {
        &self.service
    }

    /// Resolve a raw tool name (aliases and routing prefixes allowed) and dispatch
    pub async fn dispatch_named(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolOutput, DomainError> {
        let tool: ToolName = name.parse()?;
        self.dispatch(tool, arguments).await
    }

    /// Run one tool. Every validation failure is reported before the
    /// downstream API is contacted.
    pub async fn dispatch(&self, tool: ToolName, arguments: Value) -> Result<ToolOutput, DomainError> {
        debug!(tool = %tool, downstream = tool.calls_downstream(), "Dispatching tool");

        match tool {
            ToolName::ListKnowledgeBases => {
                let _: ListKnowledgeBasesInput = parse_arguments(arguments)?;
                Ok(ToolOutput::List(self.service.list_knowledge_bases()))
            }
            ToolName::SearchKnowledgeBase => {
                let input: SearchKnowledgeBaseInput = parse_arguments(arguments)?;
                let result = self.service.search(input.into_request()?).await?;
                Ok(ToolOutput::Search(SearchKnowledgeBaseOutput { result }))
            }
            ToolName::AutoSearchKnowledgeBase => {
                let input: AutoSearchKnowledgeBaseInput = parse_arguments(arguments)?;
                let output = self.service.auto_search(input.into_request()?).await?;
                Ok(ToolOutput::AutoSearch(output))
            }
        }
    }

    /// Handle a function-style event.
    ///
    /// Accepts `{"operation": <tool>, "input": {...}}` and the legacy flat
    /// form `{"action": "list_kbs" | "search", "kb_name": ..., ...}`.
    pub async fn handle_event(&self, event: Value) -> InvocationResponse {
        let span = info_span!("invocation", id = %uuid::Uuid::new_v4());

        let result = async {
            let (tool, arguments) = parse_event(event)?;
            self.dispatch(tool, arguments).await
        }
        .instrument(span.clone())
        .await;

        span.in_scope(|| match result {
            Ok(output) => InvocationResponse::ok(&output),
            Err(e) => {
                if e.is_client_error() {
                    warn!(error = %e, "Rejected invocation");
                } else {
                    error!(error = %e, "Invocation failed");
                }
                InvocationResponse::from_error(&e)
            }
        })
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, DomainError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };

    serde_json::from_value(arguments)
        .map_err(|e| DomainError::validation(format!("Invalid arguments: {}", e)))
}

fn parse_event(event: Value) -> Result<(ToolName, Value), DomainError> {
    let Value::Object(mut fields) = event else {
        return Err(DomainError::validation("Event must be a JSON object"));
    };

    if let Some(operation) = fields.remove("operation") {
        let Value::String(operation) = operation else {
            return Err(DomainError::validation("operation must be a string"));
        };

        let input = fields.remove("input").unwrap_or(Value::Null);
        return Ok((operation.parse()?, input));
    }

    let action = match fields.remove("action") {
        None => DEFAULT_LEGACY_ACTION.to_string(),
        Some(Value::String(action)) => action,
        Some(_) => return Err(DomainError::validation("action must be a string")),
    };

    let tool = match action.as_str() {
        "list_kbs" => ToolName::ListKnowledgeBases,
        "search" => ToolName::SearchKnowledgeBase,
        "auto_search" => ToolName::AutoSearchKnowledgeBase,
        other => return Err(DomainError::validation(format!("Unknown action: {}", other))),
    };

    Ok((tool, Value::Object(fields)))
}
