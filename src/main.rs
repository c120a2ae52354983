//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, and serves the MCP protocol
//! over standard input/output.

use anyhow::Result;
use rmcp::ServiceExt;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use paris_trees_mcp_server::{Config, McpServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging (stderr: stdout belongs to the protocol)
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!(
        "Dataset '{}' at {}",
        config.opendata.dataset_id, config.opendata.base_url
    );

    let server = McpServer::new(config)?;

    info!("Ready - communicating via stdin/stdout");
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
