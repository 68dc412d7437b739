//! Tool surface - names, arguments and outputs of the three knowledge base tools

mod definition;
mod input;
mod name;
mod output;

pub use definition::{tool_definitions, ToolDefinition};
pub use input::{
    AutoSearchKnowledgeBaseInput, AutoSearchRequest, ListKnowledgeBasesInput,
    SearchKnowledgeBaseInput, SearchRequest,
};
pub use name::{strip_routing_prefix, ToolName, ROUTING_PREFIX_SEPARATOR};
pub use output::{
    AutoSearchKnowledgeBaseOutput, KnowledgeBaseList, SearchKnowledgeBaseOutput, ToolOutput,
};
