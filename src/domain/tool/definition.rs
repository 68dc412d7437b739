//! Tool definitions advertised to agent gateways

use serde::Serialize;
use serde_json::{json, Value};

use super::name::{ToolName, ROUTING_PREFIX_SEPARATOR};
use crate::domain::knowledge_base::{DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT};

/// A tool as listed by `tools/list`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn for_tool(tool: ToolName, target: Option<&str>) -> Self {
        let name = match target {
            Some(target) if !target.is_empty() => {
                format!("{}{}{}", target, ROUTING_PREFIX_SEPARATOR, tool.as_str())
            }
            _ => tool.as_str().to_string(),
        };

        Self {
            name,
            description: description(tool).to_string(),
            input_schema: input_schema(tool),
        }
    }
}

/// Definitions of every tool, optionally prefixed with a gateway target name
pub fn tool_definitions(target: Option<&str>) -> Vec<ToolDefinition> {
    ToolName::ALL
        .iter()
        .map(|tool| ToolDefinition::for_tool(*tool, target))
        .collect()
}

fn description(tool: ToolName) -> &'static str {
    match tool {
        ToolName::ListKnowledgeBases => {
            "List the available knowledge bases with their descriptions. \
             Call this first to decide which knowledge base to search."
        }
        ToolName::SearchKnowledgeBase => {
            "Search the named knowledge base and return matching document \
             excerpts with relevance scores."
        }
        ToolName::AutoSearchKnowledgeBase => {
            "Pick the knowledge base that best fits the query and search it. \
             Use this when unsure which knowledge base to search."
        }
    }
}

fn max_results_schema() -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "maximum": MAX_RESULTS_LIMIT,
        "default": DEFAULT_MAX_RESULTS,
        "description": "Maximum number of results to return"
    })
}

fn input_schema(tool: ToolName) -> Value {
    match tool {
        ToolName::ListKnowledgeBases => json!({
            "type": "object",
            "properties": {}
        }),
        ToolName::SearchKnowledgeBase => json!({
            "type": "object",
            "properties": {
                "kbName": {
                    "type": "string",
                    "description": "Knowledge base name, as returned by ListKnowledgeBases"
                },
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "maxResults": max_results_schema()
            },
            "required": ["kbName", "query"]
        }),
        ToolName::AutoSearchKnowledgeBase => json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "maxResults": max_results_schema()
            },
            "required": ["query"]
        }),
    }
}
