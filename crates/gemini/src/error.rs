//! Error types for the gemini-cli bridge.

use mcp_server::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The executable could not be started at all.
    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading the child's output or waiting on it failed.
    #[error("failed to collect process output: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] mcp_server::Error),
}

impl From<Error> for rmcp::ErrorData {
    fn from(err: Error) -> Self {
        rmcp::ErrorData::internal_error(err.to_string(), None)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
