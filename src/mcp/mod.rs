//! MCP (Model Context Protocol) server for tubecache.
//!
//! Allows AI assistants like Claude to fetch and browse cached transcripts.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
