//! Error types for the weather bridge.

use mcp_server::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    /// The upstream body was not the JSON we expected.
    #[error("invalid {service} response: {source}")]
    Parse {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

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
