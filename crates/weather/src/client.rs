//! Geocoding and forecast lookups.
//!
//! A lookup is two dependent requests: the location text is resolved to
//! coordinates first, then the forecast service is asked for the current
//! conditions at the first match.

use std::fmt;

use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::{Error, Result};

pub const DEFAULT_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
/// The geocoder refuses anonymous clients.
pub const DEFAULT_USER_AGENT: &str = "weather-mcp";

pub const LOCATION_NOT_FOUND: &str = "Could not find location";

const GEOCODE_SERVICE: &str = "geocoding";
const FORECAST_SERVICE: &str = "forecast";

/// A latitude or longitude exactly as the geocoder sent it.
///
/// Nominatim sends strings; other geocoders send numbers. Either way the
/// text is forwarded unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Text(String),
    Number(Number),
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Text(s) => f.write_str(s),
            Coordinate::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One geocoder match. Other fields in the response are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeCandidate {
    pub lat: Coordinate,
    pub lon: Coordinate,
}

/// Current conditions, restricted to the fields the tool advertises.
///
/// Values are forwarded exactly as received: an upstream `3` stays `3`
/// and a `null` stays `null`. Only the key set is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: Value,
    pub windspeed: Value,
    pub winddirection: Value,
    pub weathercode: Value,
    pub is_day: Value,
    pub time: Value,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

/// Tool payload: the conditions, or the not-found marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeatherOutput {
    Current(CurrentWeather),
    NotFound { error: String },
}

impl WeatherOutput {
    pub fn not_found() -> Self {
        WeatherOutput::NotFound {
            error: LOCATION_NOT_FOUND.to_string(),
        }
    }
}

/// HTTP client for the geocoding and forecast services.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    geocode_url: String,
    forecast_url: String,
    user_agent: String,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_geocode_url(mut self, url: impl Into<String>) -> Self {
        self.geocode_url = url.into();
        self
    }

    pub fn with_forecast_url(mut self, url: impl Into<String>) -> Self {
        self.forecast_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn geocode_request_url(&self, location: &str) -> String {
        format!(
            "{}?q={}&format=json&limit=1",
            self.geocode_url,
            urlencoding::encode(location)
        )
    }

    pub fn forecast_request_url(&self, lat: &Coordinate, lon: &Coordinate) -> String {
        format!(
            "{}?latitude={}&longitude={}&current_weather=true",
            self.forecast_url,
            urlencoding::encode(&lat.to_string()),
            urlencoding::encode(&lon.to_string())
        )
    }

    /// Resolve free text to candidate coordinates (at most one).
    pub async fn geocode(&self, location: &str) -> Result<Vec<GeocodeCandidate>> {
        let url = self.geocode_request_url(location);
        tracing::debug!(%url, "geocoding");

        let request = self.http.get(&url).header(USER_AGENT, &self.user_agent);
        fetch_json(request, GEOCODE_SERVICE).await
    }

    /// Fetch current conditions at the given coordinates.
    pub async fn current_weather(
        &self,
        lat: &Coordinate,
        lon: &Coordinate,
    ) -> Result<CurrentWeather> {
        let url = self.forecast_request_url(lat, lon);
        tracing::debug!(%url, "fetching current weather");

        let response: ForecastResponse = fetch_json(self.http.get(&url), FORECAST_SERVICE).await?;
        Ok(response.current_weather)
    }

    /// Geocode, then fetch the forecast for the first match.
    ///
    /// No forecast request is made when the geocoder finds nothing.
    pub async fn lookup(&self, location: &str) -> Result<WeatherOutput> {
        tracing::info!(location, "getting weather");

        let candidates = self.geocode(location).await?;
        let Some(first) = candidates.into_iter().next() else {
            tracing::info!(location, "location not found");
            return Ok(WeatherOutput::not_found());
        };

        let current = self.current_weather(&first.lat, &first.lon).await?;
        Ok(WeatherOutput::Current(current))
    }
}

/// Send, require a success status, read the whole body, then decode it.
async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    service: &'static str,
) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            service,
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| Error::Parse { service, source })
}
