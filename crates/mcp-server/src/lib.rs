//! Shared plumbing for the MCP tool servers in this workspace.
//!
//! The protocol itself (message types, tool routing, argument decoding
//! and the streamable-HTTP transport) comes from `rmcp`. This crate holds
//! what every binary repeats around it: the `[server]` configuration
//! section, the command-line flags, log setup and the listener serving
//! `POST /mcp`.
//!
//! # Example
//!
//! ```ignore
//! use mcp_server::{ServerConfig, transport};
//!
//! # async fn example() -> mcp_server::Result<()> {
//! let config = ServerConfig::default();
//! transport::listen("Example", config.addr(3000), || Ok(MyServer::new())).await
//! # }
//! ```

pub mod cli;
pub mod config;
mod error;
pub mod logging;
pub mod transport;

pub use cli::ServerArgs;
pub use config::{ConfigError, ServerConfig};
pub use error::{Error, Result};
