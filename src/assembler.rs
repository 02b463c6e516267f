//! Weather result assembly
//!
//! Pure reduction of raw provider payloads into the normalized
//! [`WeatherResult`]: current-conditions unit mapping and the 3-hourly
//! forecast collapse to at most one record per calendar day.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::error::SkycastError;
use crate::models::{CurrentConditions, ForecastDay, ResolvedLocation, WeatherResult};
use crate::provider::wire::{CurrentResponse, ForecastResponse};
use crate::Result;

/// Maximum number of reduced forecast days
pub const FORECAST_DAYS: usize = 5;

/// Meters per mile, for the visibility conversion
const METERS_PER_MILE: f64 = 1609.34;

/// Merge a resolved location with raw current-conditions and forecast
/// payloads into the normalized result shape.
pub fn assemble_weather(
    location: ResolvedLocation,
    current: &CurrentResponse,
    forecast: &ForecastResponse,
) -> Result<WeatherResult> {
    Ok(WeatherResult {
        current: map_current_conditions(current)?,
        forecast: reduce_forecast(forecast)?,
        location,
    })
}

fn map_current_conditions(current: &CurrentResponse) -> Result<CurrentConditions> {
    let condition = current
        .weather
        .first()
        .ok_or_else(|| SkycastError::upstream("Current conditions missing weather description"))?;

    Ok(CurrentConditions {
        temperature: round_whole(current.main.temp),
        feels_like: round_whole(current.main.feels_like),
        description: condition.description.clone(),
        icon: condition.icon.clone(),
        humidity: current.main.humidity,
        wind_speed: round_whole(current.wind.speed),
        visibility: round_whole(current.visibility / METERS_PER_MILE),
        // The provider needs a separate lookup for UV; defaulted, not an error
        uv_index: 0,
        date_time: Utc::now().to_rfc3339(),
    })
}

/// Collapse the 3-hourly sample sequence to one record per calendar day.
///
/// The first sample seen for each UTC calendar date wins, capped at
/// [`FORECAST_DAYS`] records; the first record is labeled "Today" and the
/// rest get abbreviated weekday names. The high/low come from that single
/// sample's max/min fields, not a per-day aggregate - a known
/// approximation carried over from the original behavior.
fn reduce_forecast(forecast: &ForecastResponse) -> Result<Vec<ForecastDay>> {
    let mut days: Vec<ForecastDay> = Vec::with_capacity(FORECAST_DAYS);
    let mut seen_dates = HashSet::new();

    for sample in &forecast.list {
        if days.len() >= FORECAST_DAYS {
            break;
        }

        let stamp = DateTime::<Utc>::from_timestamp(sample.dt, 0)
            .ok_or_else(|| SkycastError::upstream("Forecast sample has invalid timestamp"))?;
        if !seen_dates.insert(stamp.date_naive()) {
            continue;
        }

        let condition = sample
            .weather
            .first()
            .ok_or_else(|| SkycastError::upstream("Forecast sample missing weather description"))?;

        let day_name = if days.is_empty() {
            "Today".to_string()
        } else {
            stamp.format("%a").to_string()
        };

        days.push(ForecastDay {
            date: stamp.to_rfc3339(),
            day_name,
            temp_high: round_whole(sample.main.temp_max),
            temp_low: round_whole(sample.main.temp_min),
            description: condition.description.clone(),
            icon: condition.icon.clone(),
        });
    }

    Ok(days)
}

#[allow(clippy::cast_possible_truncation)]
fn round_whole(value: f64) -> i32 {
    value.round() as i32
}
