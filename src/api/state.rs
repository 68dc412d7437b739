//! Application state for shared services

use std::sync::Arc;

use crate::domain::knowledge_base::KnowledgeBaseCatalog;
use crate::infrastructure::services::ToolDispatcher;

/// Settings for the tool-gateway transport
#[derive(Debug, Clone, Default)]
pub struct GatewaySettings {
    /// Target name prefixed to advertised tool names (`<target>___<Tool>`)
    pub target: Option<String>,
}

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ToolDispatcher>,
    pub gateway: Arc<GatewaySettings>,
}

impl AppState {
    pub fn new(dispatcher: Arc<ToolDispatcher>, gateway: GatewaySettings) -> Self {
        Self {
            dispatcher,
            gateway: Arc::new(gateway),
        }
    }

    pub fn catalog(&self) -> &KnowledgeBaseCatalog {
        self.dispatcher.service().catalog()
    }
}
