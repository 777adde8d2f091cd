//! Configuration loading for weather-mcp.

use std::net::SocketAddr;
use std::path::Path;

use mcp_server::{ConfigError, ServerConfig};
use serde::Deserialize;

use crate::client::{DEFAULT_FORECAST_URL, DEFAULT_GEOCODE_URL, DEFAULT_USER_AGENT, WeatherClient};

pub const DEFAULT_PORT: u16 = 3000;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listening address.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream services.
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherConfig {
    /// Geocoding search endpoint (Nominatim-compatible).
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,

    /// Forecast endpoint (Open-Meteo-compatible).
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Sent to the geocoder, which rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocode_url: default_geocode_url(),
            forecast_url: default_forecast_url(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_geocode_url() -> String {
    DEFAULT_GEOCODE_URL.to_string()
}

fn default_forecast_url() -> String {
    DEFAULT_FORECAST_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
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

    /// Build the upstream client described by this configuration.
    pub fn client(&self) -> WeatherClient {
        WeatherClient::new()
            .with_geocode_url(&self.weather.geocode_url)
            .with_forecast_url(&self.weather.forecast_url)
            .with_user_agent(&self.weather.user_agent)
    }
}
