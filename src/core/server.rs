//! MCP server implementation and lifecycle management.
//!
//! The server handler owns the tool router; tool logic lives in
//! `domains/tools/definitions/` behind the `TreeCatalog` seam, so adding a
//! tool does not require modifying this file.

use std::sync::Arc;

use rmcp::{
    ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler,
};

use super::config::Config;
use crate::domains::tools::build_tool_router;
use crate::domains::trees::{OpenDataClient, TreeCatalog};

/// The main MCP server handler.
///
/// Stateless and reentrant: concurrent tool calls share only the immutable
/// configuration and the HTTP client's connection pool.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server backed by the real open-data provider.
    pub fn new(config: Config) -> crate::core::Result<Self> {
        let catalog: Arc<dyn TreeCatalog> = Arc::new(OpenDataClient::new(&config.opendata)?);
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create a server over an arbitrary catalog implementation.
    pub fn with_catalog(config: Config, catalog: Arc<dyn TreeCatalog>) -> Self {
        Self {
            tool_router: build_tool_router::<Self>(catalog),
            config: Arc::new(config),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Query and analyze the Paris tree inventory (les-arbres open dataset): \
                 search trees by species, district, size or heritage status, aggregate counts \
                 per field, find trees near coordinates, and get per-species reports."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
