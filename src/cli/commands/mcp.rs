//! MCP command implementation.

use crate::config::{Prompts, Settings};
use crate::mcp::McpServer;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::sync::Arc;

/// Run the MCP server.
pub async fn run_mcp(settings: Settings) -> Result<()> {
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let orchestrator = Arc::new(Orchestrator::new(&settings).await?);

    McpServer::new(orchestrator, prompts).run().await
}
