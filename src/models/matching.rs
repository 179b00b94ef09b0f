use crate::models::{Coordinates, DistanceKm, RadiusMeters, RoutePath};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geofence around a user's location
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Circle {
    pub center: Coordinates,
    pub radius: RadiusMeters,
}

impl Circle {
    pub fn new(center: Coordinates, radius: RadiusMeters) -> Self {
        Circle { center, radius }
    }

    pub fn from_km(center: Coordinates, radius: DistanceKm) -> Self {
        Circle {
            center,
            radius: radius.to_meters(),
        }
    }

    pub fn contains(&self, point: &Coordinates) -> bool {
        self.center.distance_to_m(point) <= self.radius.as_meters()
    }
}

/// Outcome of testing one run (morning or evening) of a bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodMatch {
    pub matched: bool,
    /// Absent when the bus fell back to stop-only checking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<RoutePath>,
}

/// A bus that passes within the search radius
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub bus_id: Uuid,
    pub bus_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morning: Option<PeriodMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evening: Option<PeriodMatch>,
    /// Stops (not path points) lying inside the circle, across both runs.
    /// May be zero even though the bus matched: the road can curve through
    /// the circle between two stops.
    pub nearby_stop_count: usize,
    pub nearby_stops: Vec<String>,
    /// Any run used a fallback path, or the whole bus was checked stop-only
    pub degraded: bool,
}

impl MatchResult {
    pub fn morning_matched(&self) -> bool {
        self.morning.as_ref().is_some_and(|m| m.matched)
    }

    pub fn evening_matched(&self) -> bool {
        self.evening.as_ref().is_some_and(|m| m.matched)
    }
}

/// Query string of `GET /buses/available`
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub location: String,
    pub radius_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub location: Coordinates,
    pub address: Option<String>,
    pub radius_km: f64,
    pub buses: Vec<MatchResult>,
}
