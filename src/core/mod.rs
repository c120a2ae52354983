//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server:
//! error handling, configuration and the server handler itself.

pub mod config;
pub mod error;
pub mod server;

pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
