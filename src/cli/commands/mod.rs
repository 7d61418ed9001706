//! CLI command implementations.

mod config;
mod download;
mod list;
mod mcp;

pub use config::run_config;
pub use download::run_download;
pub use list::run_list;
pub use mcp::run_mcp;
