//! Process-lifetime memo of geocoding lookups.
//!
//! Forward lookups are keyed by the trimmed, lower-cased place name; reverse
//! lookups by the coordinate quantized to 6 decimal places. Concurrent misses
//! on the same key are coalesced into a single provider call, and failures are
//! never stored so the next lookup retries.

use crate::constants::REVERSE_GEOCODE_KEY_PRECISION;
use crate::models::Coordinates;
use crate::services::providers::{GeocodeHit, GeocodingProvider, ProviderError};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct GeoCache {
    provider: Arc<dyn GeocodingProvider>,
    forward: Cache<String, GeocodeHit>,
    reverse: Cache<(i64, i64), String>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl GeoCache {
    /// `max_entries` bounds each direction separately. Keys are deterministic,
    /// so eviction only costs a repeated provider call.
    pub fn new(provider: Arc<dyn GeocodingProvider>, max_entries: u64) -> Self {
        GeoCache {
            provider,
            forward: Cache::builder().max_capacity(max_entries).build(),
            reverse: Cache::builder().max_capacity(max_entries).build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    pub async fn geocode(&self, name: &str) -> Result<GeocodeHit, Arc<ProviderError>> {
        let key = Self::normalize_name(name);
        let provider = Arc::clone(&self.provider);
        let query = key.clone();

        let entry = self
            .forward
            .entry(key)
            .or_try_insert_with(async move { provider.geocode(&query).await })
            .await?;

        self.record(entry.is_fresh(), "geocode", entry.key());
        Ok(entry.into_value())
    }

    /// `None` when the provider knows no address there or is failing; neither
    /// outcome is cached.
    pub async fn reverse_geocode(&self, coords: &Coordinates) -> Option<String> {
        let key = coords.quantized_key(REVERSE_GEOCODE_KEY_PRECISION);
        let provider = Arc::clone(&self.provider);
        let query = coords.round(REVERSE_GEOCODE_KEY_PRECISION);

        let entry = self
            .reverse
            .entry(key)
            .or_optionally_insert_with(async move {
                match provider.reverse_geocode(&query).await {
                    Ok(address) => address,
                    Err(e) => {
                        tracing::warn!(
                            lat = query.lat,
                            lng = query.lng,
                            error = %e,
                            "Reverse geocode failed, not caching"
                        );
                        None
                    }
                }
            })
            .await?;

        self.record(entry.is_fresh(), "reverse_geocode", &format!("{:?}", entry.key()));
        Some(entry.into_value())
    }

    fn record(&self, fresh: bool, lookup: &str, key: &str) {
        if fresh {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Geo cache miss for {}: {}", lookup, key);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Geo cache hit for {}: {}", lookup, key);
        }
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
            entries: self.forward.entry_count() + self.reverse.entry_count(),
        }
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: u64,
}
