//! Session weather cache: one snapshot, refreshed at startup and when stale.
//! In memory only.

use chrono::{DateTime, Duration, Utc};

use crate::types::WeatherSnapshot;

/// Last weather snapshot for the session
#[derive(Debug, Clone)]
pub struct WeatherCache {
    data: Option<WeatherSnapshot>,
    fetched_at: Option<DateTime<Utc>>,
    max_age: Duration,
}

impl WeatherCache {
    /// Create an empty cache that goes stale after `refresh_minutes`
    pub fn new(refresh_minutes: u32) -> Self {
        Self {
            data: None,
            fetched_at: None,
            max_age: Duration::minutes(i64::from(refresh_minutes)),
        }
    }

    /// Cached snapshot, if any
    pub fn get(&self) -> Option<&WeatherSnapshot> {
        self.data.as_ref()
    }

    /// Current snapshot, or an "unknown" one if nothing was fetched yet.
    pub fn snapshot(&self) -> WeatherSnapshot {
        self.data
            .clone()
            .unwrap_or_else(|| WeatherSnapshot::unavailable("Weather not loaded yet"))
    }

    /// Store a snapshot fetched now
    pub fn update(&mut self, snapshot: WeatherSnapshot) {
        self.update_at(snapshot, Utc::now());
    }

    /// Store a snapshot fetched at `at`
    pub fn update_at(&mut self, snapshot: WeatherSnapshot, at: DateTime<Utc>) {
        self.data = Some(snapshot);
        self.fetched_at = Some(at);
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Empty caches and error snapshots are always stale.
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now())
    }

    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.data, self.fetched_at) {
            (Some(data), Some(at)) if data.error.is_none() => now - at >= self.max_age,
            _ => true,
        }
    }

    /// Forget the cached snapshot
    pub fn clear(&mut self) {
        self.data = None;
        self.fetched_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_sky() -> WeatherSnapshot {
        WeatherSnapshot {
            condition: Some("Clear".into()),
            temperature: Some(21.0),
            error: None,
        }
    }

    #[test]
    fn test_empty_cache_is_stale() {
        let cache = WeatherCache::new(30);
        assert!(cache.is_stale());
        assert!(cache.get().is_none());
        assert!(cache.snapshot().error.is_some());
    }

    #[test]
    fn test_fresh_then_stale() {
        let mut cache = WeatherCache::new(30);
        let t0 = Utc::now();
        cache.update_at(clear_sky(), t0);

        assert!(!cache.is_stale_at(t0 + Duration::minutes(29)));
        assert!(cache.is_stale_at(t0 + Duration::minutes(30)));
        assert_eq!(cache.snapshot(), clear_sky());
    }

    #[test]
    fn test_error_snapshot_is_stale() {
        let mut cache = WeatherCache::new(30);
        let t0 = Utc::now();
        cache.update_at(WeatherSnapshot::unavailable("Permission denied"), t0);
        assert!(cache.is_stale_at(t0));
    }

    #[test]
    fn test_clear() {
        let mut cache = WeatherCache::new(30);
        cache.update(clear_sky());
        cache.clear();
        assert!(cache.get().is_none());
        assert!(cache.fetched_at().is_none());
    }
}
