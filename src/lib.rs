//! `Skycast` - location-aware weather lookup engine
//!
//! This library resolves free-form location queries (city names, postal
//! codes, coordinates) into normalized current-weather and 5-day-forecast
//! data, and ranks city autocomplete suggestions as the user types.

pub mod api;
pub mod assembler;
pub mod cache;
pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod provider;
pub mod resolver;
pub mod suggest;
pub mod web;

// Re-export core types for public API
pub use cache::{Clock, ManualClock, SystemClock, WeatherCache};
pub use config::SkycastConfig;
pub use error::SkycastError;
pub use input::{PostalRegion, QueryKind};
pub use models::{CurrentConditions, ForecastDay, GeoCandidate, ResolvedLocation, WeatherResult};
pub use provider::{GeoWeatherProvider, OwmClient};
pub use resolver::WeatherService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
