//! JSON-RPC tool endpoint for agent gateways (`initialize`, `tools/list`, `tools/call`)

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::middleware::truncate_for_log;
use super::state::AppState;
use super::types::rpc::JSONRPC_VERSION;
use super::types::{RpcRequest, RpcResponse};
use crate::domain::tool::{tool_definitions, ToolOutput};
use crate::domain::DomainError;

/// Protocol versions this endpoint accepts, newest first
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] =
    &["2025-11-25", "2025-06-18", "2025-03-26", "2024-11-05"];

pub const LATEST_PROTOCOL_VERSION: &str = SUPPORTED_PROTOCOL_VERSIONS[0];

pub const PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";

/// Duplicate of the protocol version header sent by some gateways
pub const LEGACY_PROTOCOL_VERSION_HEADER: &str = "x-mcp-protocol-version";

const MAX_LOGGED_ARGUMENTS: usize = 256;

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// POST /mcp
pub async fn handle_mcp(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            return reply(
                StatusCode::OK,
                LATEST_PROTOCOL_VERSION,
                RpcResponse::parse_error(format!("Parse error: {}", e)),
            )
        }
    };

    let request: RpcRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            return reply(
                StatusCode::OK,
                LATEST_PROTOCOL_VERSION,
                RpcResponse::invalid_request(None, format!("Invalid request: {}", e)),
            )
        }
    };

    let version = match negotiate_protocol_version(&headers) {
        Ok(version) => version,
        Err(message) => {
            warn!(%message, "Rejected protocol version");
            return reply(
                StatusCode::BAD_REQUEST,
                LATEST_PROTOCOL_VERSION,
                RpcResponse::invalid_request(request.id, message),
            );
        }
    };

    if request.jsonrpc != JSONRPC_VERSION {
        return reply(
            StatusCode::OK,
            version,
            RpcResponse::invalid_request(
                request.id,
                "Unsupported jsonrpc version (expected 2.0)",
            ),
        );
    }

    if request.is_notification() {
        debug!(method = %request.method, "Received notification");
        return (
            StatusCode::ACCEPTED,
            [(PROTOCOL_VERSION_HEADER, HeaderValue::from_static(version))],
        )
            .into_response();
    }

    debug!(method = %request.method, "Received JSON-RPC request");

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(request.id, request.params.as_ref()),
        "ping" => RpcResponse::success(request.id, json!({})),
        "tools/list" => handle_tools_list(&state, request.id),
        "tools/call" => handle_tools_call(&state, request.id, request.params).await,
        other => {
            warn!(method = other, "Unknown JSON-RPC method");
            RpcResponse::method_not_found(request.id, other)
        }
    };

    reply(StatusCode::OK, version, response)
}

/// Resolve the protocol version from the two version headers.
///
/// Absent headers mean the latest version; present headers must agree and
/// name a supported version.
pub fn negotiate_protocol_version(headers: &HeaderMap) -> Result<&'static str, String> {
    let read = |name: &str| -> Result<Option<String>, String> {
        headers
            .get(name)
            .map(|value| {
                value
                    .to_str()
                    .map(|v| v.trim().to_string())
                    .map_err(|_| format!("Invalid {} header", name))
            })
            .transpose()
    };

    let primary = read(PROTOCOL_VERSION_HEADER)?;
    let legacy = read(LEGACY_PROTOCOL_VERSION_HEADER)?;

    let requested = match (primary, legacy) {
        (Some(a), Some(b)) if a != b => {
            return Err(format!(
                "Conflicting protocol version headers: {} and {}",
                a, b
            ))
        }
        (Some(version), _) | (None, Some(version)) => version,
        (None, None) => return Ok(LATEST_PROTOCOL_VERSION),
    };

    supported_version(&requested)
        .ok_or_else(|| format!("Unsupported protocol version: {}", requested))
}

fn supported_version(requested: &str) -> Option<&'static str> {
    SUPPORTED_PROTOCOL_VERSIONS
        .iter()
        .copied()
        .find(|v| *v == requested)
}

fn reply(status: StatusCode, version: &'static str, response: RpcResponse) -> Response {
    (
        status,
        [(PROTOCOL_VERSION_HEADER, HeaderValue::from_static(version))],
        Json(response),
    )
        .into_response()
}

fn handle_initialize(id: Option<Value>, params: Option<&Value>) -> RpcResponse {
    let requested = params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str);

    let version = requested
        .and_then(supported_version)
        .unwrap_or(LATEST_PROTOCOL_VERSION);

    info!(requested = ?requested, negotiated = version, "Initializing session");

    RpcResponse::success(
        id,
        json!({
            "protocolVersion": version,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

fn handle_tools_list(state: &AppState, id: Option<Value>) -> RpcResponse {
    let tools = tool_definitions(state.gateway.target.as_deref());

    RpcResponse::success(id, json!({ "tools": tools }))
}

async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> RpcResponse {
    let Some(params) = params else {
        return RpcResponse::invalid_params(id, "params must be an object with a tool name");
    };

    let params: ToolCallParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => return RpcResponse::invalid_params(id, format!("Invalid params: {}", e)),
    };

    info!(
        tool = %params.name,
        arguments = %truncate_for_log(&params.arguments.to_string(), MAX_LOGGED_ARGUMENTS),
        "Calling tool"
    );

    let result = state
        .dispatcher
        .dispatch_named(&params.name, params.arguments)
        .await;

    RpcResponse::success(id, tool_result(result))
}

/// Shape a dispatch outcome as a tool result; failures become `isError` results
fn tool_result(result: Result<ToolOutput, DomainError>) -> Value {
    match result {
        Ok(output) => json!({
            "content": [{ "type": "text", "text": output.render_text() }],
            "structuredContent": output.to_value(),
            "isError": false
        }),
        Err(e) => {
            warn!(error = %e, "Tool call failed");

            json!({
                "content": [{ "type": "text", "text": e.message() }],
                "isError": true
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_negotiate_without_headers_uses_latest() {
        assert_eq!(
            negotiate_protocol_version(&HeaderMap::new()),
            Ok(LATEST_PROTOCOL_VERSION)
        );
    }

    #[test]
    fn test_negotiate_matching_headers() {
        let map = headers(&[
            (PROTOCOL_VERSION_HEADER, "2025-06-18"),
            (LEGACY_PROTOCOL_VERSION_HEADER, "2025-06-18"),
        ]);
        assert_eq!(negotiate_protocol_version(&map), Ok("2025-06-18"));

        let map = headers(&[(LEGACY_PROTOCOL_VERSION_HEADER, "2025-11-25")]);
        assert_eq!(negotiate_protocol_version(&map), Ok("2025-11-25"));
    }

    #[test]
    fn test_negotiate_conflicting_headers() {
        let map = headers(&[
            (PROTOCOL_VERSION_HEADER, "2025-06-18"),
            (LEGACY_PROTOCOL_VERSION_HEADER, "2025-11-25"),
        ]);
        assert!(negotiate_protocol_version(&map)
            .unwrap_err()
            .starts_with("Conflicting protocol version headers"));
    }

    #[test]
    fn test_negotiate_unsupported_version() {
        let map = headers(&[(PROTOCOL_VERSION_HEADER, "1999-01-01")]);
        assert_eq!(
            negotiate_protocol_version(&map),
            Err("Unsupported protocol version: 1999-01-01".to_string())
        );
    }

    #[test]
    fn test_initialize_negotiates_version() {
        let response = handle_initialize(
            Some(json!(1)),
            Some(&json!({"protocolVersion": "2025-03-26"})),
        );
        assert_eq!(response.result.unwrap()["protocolVersion"], "2025-03-26");

        let response = handle_initialize(Some(json!(1)), Some(&json!({"protocolVersion": "0.1"})));
        assert_eq!(
            response.result.unwrap()["protocolVersion"],
            LATEST_PROTOCOL_VERSION
        );
    }

    #[test]
    fn test_tool_result_error_shape() {
        let value = tool_result(Err(DomainError::validation("kbName is required")));

        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["text"], "kbName is required");
        assert!(value.get("structuredContent").is_none());
    }
}
