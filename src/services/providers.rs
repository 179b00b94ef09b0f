//! Contracts of the external maps provider.
//!
//! The engine only talks to these traits, so tests swap in scripted fakes and
//! production wires in [`GoogleMapsClient`](crate::services::google_maps::GoogleMapsClient).

use crate::models::Coordinates;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("no maps API credential configured")]
    MissingCredential,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(String),

    #[error("no results")]
    NoResults,

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("timed out after {0}ms")]
    Timeout(u128),
}

/// Successful forward geocode
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub coordinates: Coordinates,
    pub formatted_address: String,
}

#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Resolve free text to a single best coordinate.
    /// `Err(ProviderError::NoResults)` when the provider knows no such place.
    async fn geocode(&self, text: &str) -> Result<GeocodeHit, ProviderError>;

    /// Formatted address of a coordinate, `Ok(None)` when nothing is known there.
    async fn reverse_geocode(&self, coords: &Coordinates) -> Result<Option<String>, ProviderError>;
}

/// Request for a driving path through an ordered list of stops
#[derive(Debug, Clone)]
pub struct DirectionsRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
    /// Visited in the given order; never optimized by the provider
    pub waypoints: Vec<Coordinates>,
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Returns the route's compact encoded polyline.
    async fn route(&self, request: &DirectionsRequest) -> Result<String, ProviderError>;
}
