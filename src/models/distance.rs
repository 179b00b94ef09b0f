use serde::{Deserialize, Serialize};
use std::fmt;

fn check_length(value: f64) -> Result<f64, String> {
    if !value.is_finite() {
        return Err("Distance must be a finite number".to_string());
    }
    if value < 0.0 {
        return Err("Distance cannot be negative".to_string());
    }
    Ok(value)
}

/// Search radius as callers give it, in kilometers
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceKm(pub f64);

impl DistanceKm {
    pub fn new(km: f64) -> Result<Self, String> {
        check_length(km).map(DistanceKm)
    }

    /// Geofence checks compare great-circle meters
    pub fn to_meters(self) -> DistanceMeters {
        DistanceMeters(self.0 * 1000.0)
    }

    pub fn as_km(self) -> f64 {
        self.0
    }
}

impl fmt::Display for DistanceKm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}km", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceMeters(pub f64);

impl DistanceMeters {
    pub fn new(meters: f64) -> Result<Self, String> {
        check_length(meters).map(DistanceMeters)
    }

    pub fn as_meters(self) -> f64 {
        self.0
    }
}

/// Geofence radius around the user location
pub type RadiusMeters = DistanceMeters;
