// Library exports for testing and reusability

pub mod cache;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use cache::GeoCache;
use config::MatcherConfig;
use db::BusRepository;
use services::location_resolver::LocationResolver;
use services::route_matcher::RouteMatcher;
use std::sync::Arc;

// App state for sharing across the application
pub struct AppState {
    pub bus_repo: Arc<dyn BusRepository>,
    pub geo_cache: Arc<GeoCache>,
    pub resolver: LocationResolver,
    pub matcher: RouteMatcher,
    pub matcher_config: MatcherConfig,
}
