//! Paris Trees MCP Server
//!
//! A Model Context Protocol (MCP) server exposing the Paris tree inventory
//! (the `les-arbres` open dataset) as queryable tools: filtered search,
//! group-by statistics, proximity search and per-species reports.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling and the server handler
//! - **domains**: business logic organized by bounded contexts
//!   - **trees**: query translation, the HTTP client adapter, response
//!     normalization, geo distance and aggregation
//!   - **tools**: the five MCP tool definitions and their routing
//!
//! # Example
//!
//! ```rust,no_run
//! use paris_trees_mcp_server::{Config, McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Serve over STDIO...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
