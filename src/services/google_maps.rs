use crate::constants::DEFAULT_GOOGLE_MAPS_BASE_URL;
use crate::models::Coordinates;
use crate::services::providers::{
    DirectionsProvider, DirectionsRequest, GeocodeHit, GeocodingProvider, ProviderError,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Client for the Google Maps geocoding and directions web services.
///
/// Built without a key it still constructs, but every call fails fast with
/// [`ProviderError::MissingCredential`] so callers take their fallback path.
#[derive(Clone)]
pub struct GoogleMapsClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl GoogleMapsClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        GoogleMapsClient {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_GOOGLE_MAPS_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_config(api_key: Option<String>, base_url: String, timeout: Duration) -> Self {
        GoogleMapsClient {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let api_key = self.api_key.as_ref().ok_or(ProviderError::MissingCredential)?;
        let url = format!("{}/{}/json", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", api_key)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout.as_millis())
                } else {
                    ProviderError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(status = %status, endpoint, "Maps API HTTP error {}", status);
            return Err(ProviderError::Status(format!("HTTP {}", status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Malformed(format!("{} response: {}", endpoint, e)))
    }
}

fn format_latlng(c: &Coordinates) -> String {
    format!("{},{}", c.lat, c.lng)
}

/// Map the API's `status` field onto our error taxonomy
fn check_status(status: &str) -> Result<(), ProviderError> {
    match status {
        "OK" => Ok(()),
        "ZERO_RESULTS" => Err(ProviderError::NoResults),
        other => Err(ProviderError::Status(other.to_string())),
    }
}

#[async_trait]
impl GeocodingProvider for GoogleMapsClient {
    async fn geocode(&self, text: &str) -> Result<GeocodeHit, ProviderError> {
        tracing::debug!(query = text, "Geocoding place name");

        let body: GeocodeApiResponse = self
            .get_json("geocode", &[("address", text.to_string())])
            .await?;
        check_status(&body.status)?;

        let first = body.results.into_iter().next().ok_or(ProviderError::NoResults)?;
        let location = first.geometry.location;
        let coordinates = Coordinates::new(location.lat, location.lng)
            .map_err(ProviderError::Malformed)?;

        Ok(GeocodeHit {
            coordinates,
            formatted_address: first.formatted_address,
        })
    }

    async fn reverse_geocode(&self, coords: &Coordinates) -> Result<Option<String>, ProviderError> {
        tracing::debug!(lat = coords.lat, lng = coords.lng, "Reverse geocoding");

        let body: GeocodeApiResponse = self
            .get_json("geocode", &[("latlng", format_latlng(coords))])
            .await?;

        match check_status(&body.status) {
            Ok(()) => Ok(body.results.into_iter().next().map(|r| r.formatted_address)),
            Err(ProviderError::NoResults) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl DirectionsProvider for GoogleMapsClient {
    async fn route(&self, request: &DirectionsRequest) -> Result<String, ProviderError> {
        let mut params = vec![
            ("origin", format_latlng(&request.origin)),
            ("destination", format_latlng(&request.destination)),
            ("mode", "driving".to_string()),
            ("alternatives", "false".to_string()),
        ];
        if !request.waypoints.is_empty() {
            // No "optimize:true" prefix: stop order is part of the route
            let waypoints = request
                .waypoints
                .iter()
                .map(format_latlng)
                .collect::<Vec<_>>()
                .join("|");
            params.push(("waypoints", waypoints));
        }

        tracing::debug!(
            waypoints = request.waypoints.len(),
            "Directions request with {} intermediate waypoints",
            request.waypoints.len()
        );

        let body: DirectionsApiResponse = self.get_json("directions", &params).await?;
        check_status(&body.status)?;

        let route = body.routes.into_iter().next().ok_or(ProviderError::NoResults)?;
        Ok(route.overview_polyline.points)
    }
}

// Google Maps API response types

#[derive(Debug, Deserialize)]
struct GeocodeApiResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionsApiResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    overview_polyline: EncodedPolyline,
}

#[derive(Debug, Deserialize)]
struct EncodedPolyline {
    points: String,
}
