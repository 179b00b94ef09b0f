use async_trait::async_trait;
use bus_radar::cache::GeoCache;
use bus_radar::config::MatcherConfig;
use bus_radar::db::InMemoryBusRepository;
use bus_radar::models::{Bus, Coordinates, Period, Stop};
use bus_radar::services::location_resolver::LocationResolver;
use bus_radar::services::path_provider::PathProvider;
use bus_radar::services::providers::{
    DirectionsProvider, DirectionsRequest, GeocodeHit, GeocodingProvider, ProviderError,
};
use bus_radar::services::route_matcher::RouteMatcher;
use bus_radar::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Maps provider with a fixed gazetteer and an optional canned polyline.
/// With `polyline: None` it behaves like a provider without credentials.
#[allow(dead_code)]
pub struct FakeMaps {
    pub places: HashMap<String, Coordinates>,
    pub polyline: Option<String>,
    pub geocode_calls: AtomicUsize,
    pub route_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeMaps {
    pub fn unavailable() -> Self {
        FakeMaps {
            places: HashMap::new(),
            polyline: None,
            geocode_calls: AtomicUsize::new(0),
            route_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_place(mut self, name: &str, lat: f64, lng: f64) -> Self {
        self.places
            .insert(name.to_lowercase(), Coordinates::new(lat, lng).unwrap());
        self
    }

    pub fn with_polyline(mut self, encoded: &str) -> Self {
        self.polyline = Some(encoded.to_string());
        self
    }
}

#[async_trait]
impl GeocodingProvider for FakeMaps {
    async fn geocode(&self, text: &str) -> Result<GeocodeHit, ProviderError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        if self.places.is_empty() {
            return Err(ProviderError::MissingCredential);
        }
        self.places
            .get(text)
            .map(|c| GeocodeHit {
                coordinates: *c,
                formatted_address: text.to_string(),
            })
            .ok_or(ProviderError::NoResults)
    }

    async fn reverse_geocode(&self, coords: &Coordinates) -> Result<Option<String>, ProviderError> {
        Ok(self
            .places
            .iter()
            .find(|(_, c)| c.distance_to_m(coords) < 1.0)
            .map(|(name, _)| name.clone()))
    }
}

#[async_trait]
impl DirectionsProvider for FakeMaps {
    async fn route(&self, _request: &DirectionsRequest) -> Result<String, ProviderError> {
        self.route_calls.fetch_add(1, Ordering::SeqCst);
        self.polyline.clone().ok_or(ProviderError::MissingCredential)
    }
}

/// The evening run used throughout the scenarios: campus -> Ramavarappadu -> Benz Circle
#[allow(dead_code)]
pub fn campus_bus() -> Bus {
    Bus::new(
        "Route 12",
        vec![
            Stop::new("Campus", 16.5286, 80.6393, Period::Evening, 1),
            Stop::new("Ramavarappadu", 16.5200, 80.6250, Period::Evening, 2),
            Stop::new("Benz Circle", 16.5062, 80.6480, Period::Evening, 3),
        ],
    )
}

#[allow(dead_code)]
pub fn matcher_with(maps: Arc<FakeMaps>) -> RouteMatcher {
    RouteMatcher::new(PathProvider::new(maps, Duration::from_millis(500)), 4)
}

/// Full application state on top of in-memory fakes
#[allow(dead_code)]
pub fn test_state(maps: Arc<FakeMaps>, buses: Vec<Bus>) -> Arc<AppState> {
    let geo_cache = Arc::new(GeoCache::new(maps.clone(), 100));
    Arc::new(AppState {
        bus_repo: Arc::new(InMemoryBusRepository::new(buses)),
        geo_cache: geo_cache.clone(),
        resolver: LocationResolver::new(geo_cache),
        matcher: matcher_with(maps),
        matcher_config: MatcherConfig::default(),
    })
}
