//! Domain models for location resolution and weather results

pub mod location;
pub mod weather;

pub use location::{GeoCandidate, ResolvedLocation};
pub use weather::{CurrentConditions, ForecastDay, WeatherResult};
