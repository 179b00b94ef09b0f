use crate::constants::*;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Absent key means the maps provider is unavailable: paths fall back to
    /// straight lines and place names cannot be resolved.
    pub google_maps_api_key: Option<String>,
    pub google_maps_base_url: Option<String>,
    pub geocode_cache_max_entries: u64,
    pub matcher: MatcherConfig,
}

#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Deadline applied to every outbound directions / geocoding call
    pub provider_timeout: Duration,

    /// Number of buses processed concurrently within one request
    pub concurrency: usize,

    /// Radius used when a request omits `radius_km`
    pub default_radius_km: f64,

    /// Requests asking for a larger radius are rejected
    pub max_radius_km: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS),
            concurrency: DEFAULT_MATCH_CONCURRENCY,
            default_radius_km: DEFAULT_RADIUS_KM,
            max_radius_km: DEFAULT_MAX_RADIUS_KM,
        }
    }
}

impl MatcherConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let timeout_ms: u64 = env::var("PROVIDER_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_PROVIDER_TIMEOUT_MS.to_string())
            .parse()
            .map_err(|_| "Invalid PROVIDER_TIMEOUT_MS")?;

        let concurrency: usize = env::var("MATCH_CONCURRENCY")
            .unwrap_or_else(|_| defaults.concurrency.to_string())
            .parse()
            .map_err(|_| "Invalid MATCH_CONCURRENCY")?;

        if concurrency == 0 {
            return Err("MATCH_CONCURRENCY must be at least 1".to_string());
        }

        let default_radius_km: f64 = env::var("DEFAULT_RADIUS_KM")
            .unwrap_or_else(|_| defaults.default_radius_km.to_string())
            .parse()
            .map_err(|_| "Invalid DEFAULT_RADIUS_KM")?;

        let max_radius_km: f64 = env::var("MAX_RADIUS_KM")
            .unwrap_or_else(|_| defaults.max_radius_km.to_string())
            .parse()
            .map_err(|_| "Invalid MAX_RADIUS_KM")?;

        if !(default_radius_km > 0.0 && default_radius_km <= max_radius_km) {
            return Err("DEFAULT_RADIUS_KM must be positive and not exceed MAX_RADIUS_KM".to_string());
        }

        Ok(Self {
            provider_timeout: Duration::from_millis(timeout_ms),
            concurrency,
            default_radius_km,
            max_radius_km,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            google_maps_base_url: env::var("GOOGLE_MAPS_BASE_URL").ok(),
            geocode_cache_max_entries: env::var("GEOCODE_CACHE_MAX_ENTRIES")
                .unwrap_or_else(|_| DEFAULT_GEOCODE_CACHE_MAX_ENTRIES.to_string())
                .parse()
                .map_err(|_| "Invalid GEOCODE_CACHE_MAX_ENTRIES")?,
            matcher: MatcherConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
