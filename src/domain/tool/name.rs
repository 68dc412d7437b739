//! Tool name resolution

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Separator between the gateway's routing segment and the tool name,
/// e.g. `target-kb-search___SearchKnowledgeBase`
pub const ROUTING_PREFIX_SEPARATOR: &str = "___";

/// The three operations exposed as tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolName {
    ListKnowledgeBases,
    SearchKnowledgeBase,
    AutoSearchKnowledgeBase,
}

impl ToolName {
    pub const ALL: [ToolName; 3] = [
        ToolName::ListKnowledgeBases,
        ToolName::SearchKnowledgeBase,
        ToolName::AutoSearchKnowledgeBase,
    ];

    /// Canonical operation name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListKnowledgeBases => "ListKnowledgeBases",
            Self::SearchKnowledgeBase => "SearchKnowledgeBase",
            Self::AutoSearchKnowledgeBase => "AutoSearchKnowledgeBase",
        }
    }

    /// HTTP path the operation is bound to
    pub fn path(&self) -> &'static str {
        match self {
            Self::ListKnowledgeBases => "/list-knowledge-bases",
            Self::SearchKnowledgeBase => "/search-knowledge-base",
            Self::AutoSearchKnowledgeBase => "/auto-search-knowledge-base",
        }
    }

    /// Whether the operation calls the Retrieve API
    pub fn calls_downstream(&self) -> bool {
        !matches!(self, Self::ListKnowledgeBases)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = DomainError;

    /// Accepts canonical names, snake_case names, the agent's short aliases
    /// and legacy action names, with or without a routing prefix.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match strip_routing_prefix(raw.trim()) {
            "ListKnowledgeBases" | "list_knowledge_bases" | "list_kbs" => {
                Ok(Self::ListKnowledgeBases)
            }
            "SearchKnowledgeBase" | "search_knowledge_base" | "kb_search" | "search" => {
                Ok(Self::SearchKnowledgeBase)
            }
            "AutoSearchKnowledgeBase" | "auto_search_knowledge_base" | "auto_search" => {
                Ok(Self::AutoSearchKnowledgeBase)
            }
            "" => Err(DomainError::validation("Tool name is required")),
            other => Err(DomainError::validation(format!("Unknown tool: {}", other))),
        }
    }
}

/// Drop everything up to and including the last routing separator
pub fn strip_routing_prefix(raw: &str) -> &str {
    raw.rsplit_once(ROUTING_PREFIX_SEPARATOR)
        .map(|(_, name)| name)
        .unwrap_or(raw)
}
