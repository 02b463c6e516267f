//! Integration tests for the resolution engine's pure pipeline:
//! classification, postal formatting, ranking, and cache keying work
//! together without any network access.

use std::sync::Arc;
use std::time::Duration;

use skycast::cache::{self, ManualClock, WeatherCache};
use skycast::input::{self, PostalRegion, QueryKind};
use skycast::models::{CurrentConditions, GeoCandidate, ResolvedLocation, WeatherResult};
use skycast::suggest;

fn candidate(name: &str, country: &str, state: Option<&str>) -> GeoCandidate {
    GeoCandidate {
        name: name.to_string(),
        country: country.to_string(),
        state: state.map(String::from),
        lat: 0.0,
        lon: 0.0,
    }
}

#[test]
fn classified_postal_codes_format_to_upstream_queries() {
    let cases = [
        ("90210", "90210,US"),
        ("SW1A 1AA", "SW1A 1AA,GB"),
        ("K1A 0A6", "K1A 0A6,CA"),
        ("1234", "1234,US"),
    ];

    for (raw, expected) in cases {
        match input::classify(raw) {
            QueryKind::Zipcode(region) => {
                assert_eq!(input::format_postal_query(raw, region), expected);
            }
            QueryKind::FreeText => panic!("'{raw}' should classify as a postal code"),
        }
    }
}

#[test]
fn free_text_queries_skip_postal_formatting() {
    assert_eq!(input::classify("Paris"), QueryKind::FreeText);
    assert_eq!(input::classify("Beverly Hills, CA"), QueryKind::FreeText);
}

#[test]
fn caller_supplied_country_code_is_preserved() {
    assert_eq!(
        input::format_postal_query("90210,MX", PostalRegion::UnitedStates),
        "90210,MX"
    );
}

#[test]
fn ranked_suggestions_prefer_established_us_cities() {
    let suggestions = suggest::rank_suggestions(
        vec![
            candidate("Springfield Station", "US", Some("Illinois")),
            candidate("Springs", "ZW", None),
            candidate("Springfield", "US", Some("Illinois")),
            candidate("springfield", "US", None),
            candidate("Springfield", "CA", None),
        ],
        "springf",
    );

    // The station is filtered, the dedup keeps the stated US entry,
    // and ordering follows the additive score
    assert_eq!(
        suggestions
            .iter()
            .map(|s| (s.name.as_str(), s.country.as_str()))
            .collect::<Vec<_>>(),
        vec![
            ("Springfield", "US"),
            ("Springfield", "CA"),
            ("Springs", "ZW"),
        ]
    );
    assert_eq!(suggestions[0].state.as_deref(), Some("Illinois"));
}

#[test]
fn cache_round_trip_honors_ttl_boundaries() {
    let clock = Arc::new(ManualClock::new());
    let cache = WeatherCache::with_clock(Duration::from_secs(600), Box::new(clock.clone()));
    let result = WeatherResult {
        location: ResolvedLocation {
            city: "New York".to_string(),
            country: "US".to_string(),
            lat: 40.7128,
            lon: -74.0059,
        },
        current: CurrentConditions {
            temperature: 72,
            feels_like: 75,
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
            humidity: 40,
            wind_speed: 8,
            visibility: 10,
            uv_index: 0,
            date_time: "2024-06-01T12:00:00+00:00".to_string(),
        },
        forecast: Vec::new(),
    };

    let key = cache::coords_key(40.7128, -74.0059);
    cache.put(key.clone(), result.clone());

    // A nearby coordinate produces the identical key within the TTL window
    assert_eq!(key, cache::coords_key(40.7131, -74.0062));

    clock.advance(Duration::from_secs(599));
    assert_eq!(cache.get(&key), Some(result));

    clock.advance(Duration::from_secs(2));
    assert!(cache.get(&key).is_none());
}
