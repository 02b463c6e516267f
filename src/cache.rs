//! In-process weather result cache with time-bounded freshness
//!
//! Memoizes assembled [`WeatherResult`]s per lookup key for a fixed TTL.
//! Expiry is lazy: an entry past its TTL is removed when next read, not by
//! a background sweep. The clock is injected so TTL behavior is testable
//! without real waits.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::WeatherResult;

/// Default time-to-live for cached weather results
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Time source for cache freshness checks
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;
}

// Shared clocks, so a test can hold the clock it handed to the cache
impl<C: Clock> Clock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Wall-clock time source used in production
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic TTL tests
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Advance the clock by `delta`
    pub fn advance(&self, delta: Duration) {
        let mut offset = self.offset.lock().expect("clock lock poisoned");
        *offset += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().expect("clock lock poisoned")
    }
}

struct CacheEntry {
    value: WeatherResult,
    created_at: Instant,
}

/// TTL-bounded in-memory cache of assembled weather results.
///
/// Individual operations are atomic; no compound read-modify-write spans
/// an await in callers, so two concurrent misses for the same key may both
/// fetch upstream and both write, the second write winning. That is a
/// tolerated inefficiency: writes for a key are idempotent within a TTL
/// window.
pub struct WeatherCache {
    ttl: Duration,
    clock: Box<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl WeatherCache {
    /// Create a cache with the given TTL and the system clock
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Box::new(SystemClock))
    }

    /// Create a cache with an injected clock
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Retrieve a fresh entry, evicting it first if expired
    pub fn get(&self, key: &str) -> Option<WeatherResult> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let now = self.clock.now();

        match entries.get(key) {
            Some(entry) if now.duration_since(entry.created_at) <= self.ttl => {
                debug!("Cache hit for '{}'", key);
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!("Cache entry for '{}' expired, evicting", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value under `key`, unconditionally overwriting any existing
    /// entry and resetting its age to zero
    pub fn put(&self, key: String, value: WeatherResult) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key,
            CacheEntry {
                value,
                created_at: self.clock.now(),
            },
        );
    }
}

/// Cache key for a place-name search
#[must_use]
pub fn search_key(query: &str) -> String {
    format!("search:{}", query.to_lowercase())
}

/// Cache key for a coordinate lookup.
///
/// Coordinates are rounded to 2 decimals so nearby points (within ~0.01
/// degrees) share a cache entry, increasing the hit rate.
#[must_use]
pub fn coords_key(lat: f64, lon: f64) -> String {
    format!("coords:{lat:.2},{lon:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrentConditions, ResolvedLocation};

    fn result(city: &str) -> WeatherResult {
        WeatherResult {
            location: ResolvedLocation {
                city: city.to_string(),
                country: "US".to_string(),
                lat: 40.71,
                lon: -74.0,
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
        }
    }

    fn cache_with_manual_clock() -> (WeatherCache, std::sync::Arc<ManualClock>) {
        let clock = std::sync::Arc::new(ManualClock::new());
        let cache = WeatherCache::with_clock(DEFAULT_TTL, Box::new(clock.clone()));
        (cache, clock)
    }

    #[test]
    fn test_entry_fresh_just_under_ttl() {
        let (cache, clock) = cache_with_manual_clock();
        cache.put(search_key("Seattle"), result("Seattle"));

        clock.advance(Duration::from_secs(9 * 60 + 59));
        let hit = cache.get(&search_key("Seattle")).expect("entry still fresh");
        assert_eq!(hit.location.city, "Seattle");
    }

    #[test]
    fn test_entry_absent_just_over_ttl() {
        let (cache, clock) = cache_with_manual_clock();
        cache.put(search_key("Seattle"), result("Seattle"));

        clock.advance(Duration::from_secs(10 * 60 + 1));
        assert!(cache.get(&search_key("Seattle")).is_none());
        // Expired entry was evicted, not just hidden
        let entries = cache.entries.lock().unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_put_resets_entry_age() {
        let (cache, clock) = cache_with_manual_clock();
        cache.put(search_key("Seattle"), result("Seattle"));

        clock.advance(Duration::from_secs(9 * 60));
        cache.put(search_key("Seattle"), result("Seattle"));

        clock.advance(Duration::from_secs(9 * 60));
        assert!(cache.get(&search_key("Seattle")).is_some());
    }

    #[test]
    fn test_search_key_lowercases_query() {
        assert_eq!(search_key("New York"), "search:new york");
    }

    #[test]
    fn test_coords_key_rounds_nearby_coordinates_together() {
        assert_eq!(
            coords_key(40.7128, -74.0059),
            coords_key(40.7131, -74.0062)
        );
        assert_eq!(coords_key(40.7128, -74.0059), "coords:40.71,-74.01");
    }

    #[test]
    fn test_missing_key_is_none() {
        let cache = WeatherCache::new(DEFAULT_TTL);
        assert!(cache.get("search:nowhere").is_none());
    }
}
