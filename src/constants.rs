//! Stable application-wide constants.
//!
//! Values here are structural limits and default fallbacks for env-var-based
//! configuration. Tuning knobs that vary per deployment live in
//! [`MatcherConfig`](crate::config::MatcherConfig).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Maps provider ---

/// Base URL of the Google Maps web services (geocode + directions).
pub const DEFAULT_GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
/// Deadline for a single outbound provider call. Overridden by `PROVIDER_TIMEOUT_MS`.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5_000;
/// Intermediate waypoints accepted by the directions API in one request.
pub const MAX_DIRECTIONS_WAYPOINTS: usize = 25;
/// Decimal places of the directions API's encoded polylines.
pub const POLYLINE_PRECISION: u32 = 5;

// --- Geocode cache ---

/// Decimal places kept when keying reverse lookups (~0.11 m).
pub const REVERSE_GEOCODE_KEY_PRECISION: u32 = 6;
/// Upper bound on cached entries per lookup direction. Overridden by
/// `GEOCODE_CACHE_MAX_ENTRIES`.
pub const DEFAULT_GEOCODE_CACHE_MAX_ENTRIES: u64 = 10_000;

// --- Matching ---

/// Search radius when the request does not specify one. Overridden by `DEFAULT_RADIUS_KM`.
pub const DEFAULT_RADIUS_KM: f64 = 2.0;
/// Largest radius a request may ask for. Overridden by `MAX_RADIUS_KM`.
pub const DEFAULT_MAX_RADIUS_KM: f64 = 50.0;
/// Buses whose paths are built concurrently. Overridden by `MATCH_CONCURRENCY`.
pub const DEFAULT_MATCH_CONCURRENCY: usize = 8;
/// Segments shorter than this (radians of arc, ~6 mm) are treated as a point.
pub const DEGENERATE_SEGMENT_RAD: f64 = 1e-9;
