//! Location models for geocoding candidates and resolved lookups

use serde::{Deserialize, Serialize};

/// A raw location candidate as returned by the geocoding provider.
///
/// Candidates are transient: they live for a single ranking pass and are
/// returned unchanged (minus any scoring metadata) as autocomplete
/// suggestions, best match first.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeoCandidate {
    /// Place name
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: String,
    /// State or region, when the provider knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

/// The outcome of classifying an input and resolving it upstream.
///
/// Immutable once produced; its coordinates feed the weather fetches and
/// its identity feeds the cache key.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Resolved city name
    pub city: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl From<GeoCandidate> for ResolvedLocation {
    fn from(candidate: GeoCandidate) -> Self {
        Self {
            city: candidate.name,
            country: candidate.country,
            lat: candidate.lat,
            lon: candidate.lon,
        }
    }
}
