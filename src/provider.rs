//! Upstream geocoding and weather provider client
//!
//! HTTP client for the OpenWeatherMap geocoding and weather APIs with
//! request timeout, bounded retry with exponential backoff, and typed
//! error mapping. The raw wire shapes live in [`wire`]; everything beyond
//! this module works with domain models or assembled results.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::SkycastConfig;
use crate::error::SkycastError;
use crate::models::{GeoCandidate, ResolvedLocation};
use crate::Result;

/// Raw OpenWeatherMap response shapes
pub mod wire {
    use serde::Deserialize;

    /// One record from the direct or reverse geocoding endpoints
    #[derive(Debug, Clone, Deserialize)]
    pub struct GeoRecord {
        pub name: String,
        pub lat: f64,
        pub lon: f64,
        #[serde(default)]
        pub country: String,
        pub state: Option<String>,
    }

    /// Response from the zip geocoding endpoint
    #[derive(Debug, Clone, Deserialize)]
    pub struct ZipRecord {
        pub name: Option<String>,
        pub lat: f64,
        pub lon: f64,
        pub country: Option<String>,
    }

    /// Response from the current-conditions endpoint
    #[derive(Debug, Clone, Deserialize)]
    pub struct CurrentResponse {
        pub main: CurrentMain,
        pub weather: Vec<Condition>,
        pub wind: Wind,
        /// Visibility in meters
        pub visibility: f64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CurrentMain {
        pub temp: f64,
        pub feels_like: f64,
        pub humidity: i32,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Condition {
        pub description: String,
        pub icon: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Wind {
        pub speed: f64,
    }

    /// Response from the 5-day forecast endpoint: 3-hourly samples
    #[derive(Debug, Clone, Deserialize)]
    pub struct ForecastResponse {
        pub list: Vec<ForecastSample>,
    }

    /// A single 3-hour forecast sample
    #[derive(Debug, Clone, Deserialize)]
    pub struct ForecastSample {
        /// Unix timestamp (seconds)
        pub dt: i64,
        pub main: SampleMain,
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SampleMain {
        pub temp_max: f64,
        pub temp_min: f64,
    }
}

/// Contract the resolution engine requires from the upstream provider.
///
/// Split out as a trait so the resolver can be exercised against a stub
/// without network access.
#[async_trait]
pub trait GeoWeatherProvider: Send + Sync {
    /// Geocode a free-text query, returning up to `limit` candidates
    async fn geocode_direct(&self, query: &str, limit: u32) -> Result<Vec<GeoCandidate>>;

    /// Geocode a formatted postal query; `None` means not found
    async fn geocode_zip(&self, formatted: &str) -> Result<Option<ResolvedLocation>>;

    /// Reverse geocode coordinates; the first record is authoritative
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Vec<GeoCandidate>>;

    /// Fetch raw current conditions for coordinates
    async fn current_conditions(&self, lat: f64, lon: f64) -> Result<wire::CurrentResponse>;

    /// Fetch the raw 3-hourly forecast for coordinates
    async fn forecast(&self, lat: f64, lon: f64) -> Result<wire::ForecastResponse>;
}

/// OpenWeatherMap API client
pub struct OwmClient {
    client: Client,
    api_key: String,
    geo_base_url: String,
    weather_base_url: String,
    max_retries: u32,
}

impl OwmClient {
    /// Create a new client from configuration
    pub fn new(config: &SkycastConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.weather.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("Skycast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SkycastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.weather.api_key.clone().unwrap_or_default(),
            geo_base_url: config.weather.geo_base_url.clone(),
            weather_base_url: config.weather.base_url.clone(),
            max_retries: config.weather.max_retries,
        })
    }

    /// GET a URL and deserialize the JSON body, retrying transport errors
    /// and server errors with exponential backoff. 404 maps to `NotFound`,
    /// other non-success statuses to `Upstream`.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let max_attempts = self.max_retries + 1;
        let mut attempt = 0;

        loop {
            debug!("HTTP request (attempt {}/{})", attempt + 1, max_attempts);

            let outcome = self.client.get(url).send().await;
            match outcome {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<T>().await.map_err(|e| {
                            SkycastError::upstream(format!("Malformed upstream response: {e}"))
                        });
                    }
                    if status == StatusCode::NOT_FOUND {
                        return Err(SkycastError::not_found("Location not found"));
                    }
                    if status.is_server_error() && attempt < max_attempts - 1 {
                        let backoff = Duration::from_millis(1000 * 2_u64.pow(attempt));
                        warn!("Upstream returned {}, retrying in {:?}", status, backoff);
                        tokio::time::sleep(backoff).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(SkycastError::upstream(format!(
                        "Upstream request failed with status {status}"
                    )));
                }
                Err(e) if attempt < max_attempts - 1 => {
                    let backoff = Duration::from_millis(1000 * 2_u64.pow(attempt));
                    warn!("Network error: {}, retrying in {:?}", e, backoff);
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(SkycastError::upstream(format!(
                        "Network error after {max_attempts} attempts: {e}"
                    )));
                }
            }
        }
    }
}

#[async_trait]
impl GeoWeatherProvider for OwmClient {
    async fn geocode_direct(&self, query: &str, limit: u32) -> Result<Vec<GeoCandidate>> {
        debug!("Geocoding query: '{}' (limit {})", query, limit);
        let url = format!(
            "{}/direct?q={}&limit={}&appid={}",
            self.geo_base_url,
            urlencoding::encode(query),
            limit,
            self.api_key
        );

        let records: Vec<wire::GeoRecord> = self.get_json(&url).await?;
        Ok(records
            .into_iter()
            .map(|record| GeoCandidate {
                name: record.name,
                country: record.country,
                state: record.state,
                lat: record.lat,
                lon: record.lon,
            })
            .collect())
    }

    async fn geocode_zip(&self, formatted: &str) -> Result<Option<ResolvedLocation>> {
        debug!("Geocoding postal query: '{}'", formatted);
        let url = format!(
            "{}/zip?zip={}&appid={}",
            self.geo_base_url,
            urlencoding::encode(formatted),
            self.api_key
        );

        match self.get_json::<wire::ZipRecord>(&url).await {
            Ok(record) => Ok(Some(ResolvedLocation {
                city: record.name.unwrap_or_else(|| "Unknown Location".to_string()),
                country: record.country.unwrap_or_default(),
                lat: record.lat,
                lon: record.lon,
            })),
            Err(SkycastError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Vec<GeoCandidate>> {
        debug!("Reverse geocoding: ({:.4}, {:.4})", lat, lon);
        let url = format!(
            "{}/reverse?lat={lat}&lon={lon}&limit=1&appid={}",
            self.geo_base_url, self.api_key
        );

        let records: Vec<wire::GeoRecord> = self.get_json(&url).await?;
        Ok(records
            .into_iter()
            .map(|record| GeoCandidate {
                name: record.name,
                country: record.country,
                state: record.state,
                lat: record.lat,
                lon: record.lon,
            })
            .collect())
    }

    async fn current_conditions(&self, lat: f64, lon: f64) -> Result<wire::CurrentResponse> {
        debug!("Fetching current conditions: ({:.4}, {:.4})", lat, lon);
        let url = format!(
            "{}/weather?lat={lat}&lon={lon}&appid={}&units=imperial",
            self.weather_base_url, self.api_key
        );
        self.get_json(&url).await
    }

    async fn forecast(&self, lat: f64, lon: f64) -> Result<wire::ForecastResponse> {
        debug!("Fetching forecast: ({:.4}, {:.4})", lat, lon);
        let url = format!(
            "{}/forecast?lat={lat}&lon={lon}&appid={}&units=imperial",
            self.weather_base_url, self.api_key
        );
        self.get_json(&url).await
    }
}
