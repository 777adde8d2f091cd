//! Configuration loading for gemini-mcp.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use mcp_server::{ConfigError, ServerConfig};
use serde::Deserialize;

use crate::cli::{DEFAULT_COMMAND, DEFAULT_MODEL, GeminiCli};

pub const DEFAULT_PORT: u16 = 3001;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listening address.
    #[serde(default)]
    pub server: ServerConfig,

    /// How the gemini executable is launched.
    #[serde(default)]
    pub gemini: GeminiConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Executable name or path.
    #[serde(default = "default_command")]
    pub command: String,

    /// Value passed with `-m`.
    #[serde(default = "default_model")]
    pub model: String,

    /// Directory the executable runs in; inherits ours when unset.
    pub working_dir: Option<PathBuf>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            model: default_model(),
            working_dir: None,
        }
    }
}

fn default_command() -> String {
    DEFAULT_COMMAND.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        mcp_server::config::load(path)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        mcp_server::config::parse(toml)
    }

    pub fn addr(&self) -> SocketAddr {
        self.server.addr(DEFAULT_PORT)
    }

    /// Build the process bridge described by this configuration.
    pub fn cli(&self) -> GeminiCli {
        let cli = GeminiCli::new(&self.gemini.model).with_command(&self.gemini.command);
        match &self.gemini.working_dir {
            Some(dir) => cli.with_working_dir(dir),
            None => cli,
        }
    }
}
