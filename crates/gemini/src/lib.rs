//! gemini-mcp: an MCP server exposing the gemini CLI as one tool.
//!
//! The `invokeGemini` tool runs `gemini -m <model> --yolo -p <prompt>`
//! and returns what it printed. See [`cli::GeminiCli`] for the process
//! handling and [`server::GeminiServer`] for the MCP surface.

pub mod cli;
pub mod config;
mod error;
pub mod server;

pub use cli::{CapturedRun, GeminiCli, InvokeOutput};
pub use config::Config;
pub use error::{Error, Result};
pub use server::{GeminiServer, SERVER_NAME};
