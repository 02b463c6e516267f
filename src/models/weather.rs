//! Normalized weather result models
//!
//! These are the wire shapes consumed by the presentation layer, so field
//! names serialize in camelCase.

use serde::{Deserialize, Serialize};

use crate::models::ResolvedLocation;

/// Normalized current conditions for a resolved location.
///
/// All temperatures and speeds are whole imperial units; `uv_index` is
/// always 0 because the upstream provider needs a separate lookup for it
/// (documented limitation, not an error).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    /// Temperature in degrees Fahrenheit, rounded
    pub temperature: i32,
    /// Perceived temperature in degrees Fahrenheit, rounded
    pub feels_like: i32,
    /// Human-readable conditions description
    pub description: String,
    /// Provider icon code
    pub icon: String,
    /// Relative humidity percentage, passed through unchanged
    pub humidity: i32,
    /// Wind speed in mph, rounded
    pub wind_speed: i32,
    /// Visibility in miles, converted from meters and rounded
    pub visibility: i32,
    /// UV index; always 0 from this data source
    pub uv_index: i32,
    /// Observation timestamp, ISO-8601
    pub date_time: String,
}

/// One reduced forecast record per calendar day.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    /// Sample timestamp, ISO-8601
    pub date: String,
    /// "Today" for the first entry, abbreviated weekday after that
    pub day_name: String,
    /// High temperature in degrees Fahrenheit, rounded
    pub temp_high: i32,
    /// Low temperature in degrees Fahrenheit, rounded
    pub temp_low: i32,
    /// Human-readable conditions description
    pub description: String,
    /// Provider icon code
    pub icon: String,
}

/// The assembled weather result: the unit of caching and of the external
/// response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherResult {
    /// The resolved location this result describes
    pub location: ResolvedLocation,
    /// Current conditions
    pub current: CurrentConditions,
    /// Up to five daily forecast entries, chronological
    pub forecast: Vec<ForecastDay>,
}
