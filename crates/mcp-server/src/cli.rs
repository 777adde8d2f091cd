//! Command-line flags every server binary accepts.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Args;
use serde::de::DeserializeOwned;

use crate::config::{self, ConfigError, ServerConfig};

/// Flattened into each binary's parser.
#[derive(Debug, Default, Args)]
pub struct ServerArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,
}

impl ServerArgs {
    /// The configuration file named by `--config`, or defaults without one.
    pub fn load_config<T: DeserializeOwned + Default>(&self) -> Result<T, ConfigError> {
        match &self.config {
            Some(path) => config::load(path),
            None => Ok(T::default()),
        }
    }

    /// Flags and `PORT` override the file.
    pub fn apply(&self, server: &mut ServerConfig) {
        if let Some(host) = self.host {
            server.host = host;
        }
        if let Some(port) = self.port {
            server.port = Some(port);
        }
    }
}
