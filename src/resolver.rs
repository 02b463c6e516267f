//! Location resolution and weather lookup orchestration
//!
//! Ties the pure pieces together: classify the input, format postal
//! queries, call the upstream provider, assemble the normalized result,
//! and memoize it in the TTL cache. Autocomplete bypasses the cache and
//! assembler entirely and never fails: upstream trouble degrades to an
//! empty suggestion list.

use tracing::{debug, warn};

use crate::cache::{self, WeatherCache};
use crate::error::SkycastError;
use crate::input::{self, QueryKind};
use crate::models::{GeoCandidate, ResolvedLocation, WeatherResult};
use crate::provider::GeoWeatherProvider;
use crate::{assembler, suggest, Result};

/// Result count requested from the geocoder for autocomplete queries
const SUGGESTION_FETCH_LIMIT: u32 = 10;

/// Minimum autocomplete query length
const MIN_SUGGEST_QUERY_LEN: usize = 2;

/// Weather lookup service: the core operations consumed by the transport
/// layer.
pub struct WeatherService {
    provider: Box<dyn GeoWeatherProvider>,
    cache: WeatherCache,
}

impl WeatherService {
    /// Create a service from a provider and a cache
    #[must_use]
    pub fn new(provider: Box<dyn GeoWeatherProvider>, cache: WeatherCache) -> Self {
        Self { provider, cache }
    }

    /// Resolve a free-form query (city name or postal code) to a weather
    /// result.
    ///
    /// Returns `NotFound` when geocoding yields no candidate and
    /// `Upstream` when any provider call fails.
    pub async fn resolve_by_search(&self, query: &str) -> Result<WeatherResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SkycastError::validation("Please enter a location"));
        }

        let cache_key = cache::search_key(query);
        if let Some(hit) = self.cache.get(&cache_key) {
            return Ok(hit);
        }

        let location = match input::classify(query) {
            QueryKind::Zipcode(region) => {
                let formatted = input::format_postal_query(query, region);
                debug!("Query '{}' classified as postal code: '{}'", query, formatted);
                self.provider
                    .geocode_zip(&formatted)
                    .await?
                    .ok_or_else(|| SkycastError::not_found("Zipcode not found"))?
            }
            QueryKind::FreeText => {
                debug!("Query '{}' classified as place name", query);
                let mut candidates = self.provider.geocode_direct(query, 1).await?;
                if candidates.is_empty() {
                    return Err(SkycastError::not_found("Location not found"));
                }
                ResolvedLocation::from(candidates.remove(0))
            }
        };

        let result = self.fetch_and_assemble(location).await?;
        self.cache.put(cache_key, result.clone());
        Ok(result)
    }

    /// Resolve coordinates to a weather result.
    ///
    /// Reverse geocoding failures fall back to an unnamed location rather
    /// than failing the request; weather fetch failures still surface as
    /// `Upstream`.
    pub async fn resolve_by_coordinates(&self, lat: f64, lon: f64) -> Result<WeatherResult> {
        let cache_key = cache::coords_key(lat, lon);
        if let Some(hit) = self.cache.get(&cache_key) {
            return Ok(hit);
        }

        let (city, country) = match self.provider.reverse_geocode(lat, lon).await {
            Ok(mut candidates) if !candidates.is_empty() => {
                let first = candidates.remove(0);
                (first.name, first.country)
            }
            Ok(_) => {
                debug!("No reverse geocoding results for ({:.4}, {:.4})", lat, lon);
                ("Unknown Location".to_string(), String::new())
            }
            Err(e) => {
                warn!("Reverse geocoding failed: {}", e);
                ("Unknown Location".to_string(), String::new())
            }
        };

        let location = ResolvedLocation {
            city,
            country,
            lat,
            lon,
        };
        let result = self.fetch_and_assemble(location).await?;
        self.cache.put(cache_key, result.clone());
        Ok(result)
    }

    /// Produce ranked autocomplete suggestions for a partial query.
    ///
    /// Never fails: sub-minimum queries and upstream errors both yield an
    /// empty list.
    pub async fn suggest(&self, query: &str) -> Vec<GeoCandidate> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_QUERY_LEN {
            return Vec::new();
        }

        match self
            .provider
            .geocode_direct(query, SUGGESTION_FETCH_LIMIT)
            .await
        {
            Ok(candidates) => suggest::rank_suggestions(candidates, query),
            Err(e) => {
                warn!("Autocomplete lookup failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }

    /// Fetch current conditions and forecast in parallel, then assemble.
    /// Geocoding has already completed; these two calls are independent.
    async fn fetch_and_assemble(&self, location: ResolvedLocation) -> Result<WeatherResult> {
        let (current, forecast) = tokio::try_join!(
            self.provider.current_conditions(location.lat, location.lon),
            self.provider.forecast(location.lat, location.lon),
        )?;

        assembler::assemble_weather(location, &current, &forecast)
    }
}
