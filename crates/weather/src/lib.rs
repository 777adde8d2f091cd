//! weather-mcp: an MCP server reporting current weather for a place name.
//!
//! The `getCurrentWeather` tool geocodes the location with Nominatim and
//! then asks Open-Meteo for current conditions at the first match.

pub mod client;
pub mod config;
mod error;
pub mod server;

pub use client::{Coordinate, CurrentWeather, GeocodeCandidate, WeatherClient, WeatherOutput};
pub use config::Config;
pub use error::{Error, Result};
pub use server::{SERVER_NAME, WeatherServer};
