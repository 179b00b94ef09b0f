use crate::constants::{MAX_DIRECTIONS_WAYPOINTS, POLYLINE_PRECISION};
use crate::models::{Coordinates, RoutePath, Stop};
use crate::services::providers::{DirectionsProvider, DirectionsRequest, ProviderError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Builds the trajectory of one bus run.
///
/// Never fails: every provider problem (missing key, network, timeout,
/// non-OK status, undecodable geometry) yields the straight line through the
/// stops with `degraded` set.
#[derive(Clone)]
pub struct PathProvider {
    directions: Arc<dyn DirectionsProvider>,
    timeout: Duration,
}

impl PathProvider {
    pub fn new(directions: Arc<dyn DirectionsProvider>, timeout: Duration) -> Self {
        PathProvider { directions, timeout }
    }

    /// `stops` must already be in run order.
    pub async fn build_path(&self, stops: &[&Stop]) -> RoutePath {
        let points: Vec<Coordinates> = stops.iter().map(|s| s.coordinates).collect();

        if points.len() < 2 {
            return RoutePath::straight_line(points, false);
        }

        match self.fetch_road_path(&points).await {
            Ok(road) => {
                debug!(
                    stops = points.len(),
                    path_points = road.len(),
                    "Road path: {} stops expanded to {} points",
                    points.len(),
                    road.len()
                );
                RoutePath::directions(road)
            }
            Err(e) => {
                warn!(
                    stops = points.len(),
                    error = %e,
                    "Directions unavailable, using straight-line path"
                );
                RoutePath::straight_line(points, true)
            }
        }
    }

    async fn fetch_road_path(&self, points: &[Coordinates]) -> Result<Vec<Coordinates>, ProviderError> {
        let (origin, rest) = points.split_first().ok_or(ProviderError::NoResults)?;
        let (destination, waypoints) = rest.split_last().ok_or(ProviderError::NoResults)?;

        if waypoints.len() > MAX_DIRECTIONS_WAYPOINTS {
            return Err(ProviderError::Malformed(format!(
                "{} waypoints exceeds provider limit of {}",
                waypoints.len(),
                MAX_DIRECTIONS_WAYPOINTS
            )));
        }

        let request = DirectionsRequest {
            origin: *origin,
            destination: *destination,
            waypoints: waypoints.to_vec(),
        };

        let encoded = tokio::time::timeout(self.timeout, self.directions.route(&request))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_millis()))??;

        decode_road_path(&encoded)
    }
}

/// Decode the provider's encoded polyline; every point must be a valid coordinate.
fn decode_road_path(encoded: &str) -> Result<Vec<Coordinates>, ProviderError> {
    let line = polyline::decode_polyline(encoded, POLYLINE_PRECISION)
        .map_err(|e| ProviderError::Malformed(format!("undecodable polyline: {}", e)))?;

    let points = line
        .into_iter()
        .map(|c| Coordinates::new(c.y, c.x))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ProviderError::Malformed)?;

    if points.is_empty() {
        return Err(ProviderError::Malformed("empty polyline".to_string()));
    }

    Ok(points)
}
