use serde::{Deserialize, Serialize};

/// Mean Earth radius used by every great-circle computation in the crate.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        let coords = Coordinates { lat, lng };
        coords.validate()?;
        Ok(coords)
    }

    /// Check that both components are finite and inside the WGS84 ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                self.lat
            ));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                self.lng
            ));
        }
        Ok(())
    }

    /// Calculate distance between two coordinates using Haversine formula
    /// Returns distance in kilometers
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        self.distance_to_m(other) / 1000.0
    }

    /// Haversine distance in meters
    pub fn distance_to_m(&self, other: &Coordinates) -> f64 {
        EARTH_RADIUS_M * self.angular_distance_to(other)
    }

    /// Central angle (radians) between two points on the unit sphere
    pub fn angular_distance_to(&self, other: &Coordinates) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);

        2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt())
    }

    /// Initial great-circle bearing towards `other`, in radians
    pub fn bearing_to(&self, other: &Coordinates) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let y = delta_lng.sin() * lat2_rad.cos();
        let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lng.cos();
        y.atan2(x)
    }

    /// Round coordinates to specified decimal places for caching
    pub fn round(&self, decimal_places: u32) -> Self {
        let multiplier = 10_f64.powi(decimal_places as i32);
        Coordinates {
            lat: (self.lat * multiplier).round() / multiplier,
            lng: (self.lng * multiplier).round() / multiplier,
        }
    }

    /// Integer key with `decimal_places` of precision, usable in hash maps
    pub fn quantized_key(&self, decimal_places: u32) -> (i64, i64) {
        let multiplier = 10_f64.powi(decimal_places as i32);
        (
            (self.lat * multiplier).round() as i64,
            (self.lng * multiplier).round() as i64,
        )
    }
}
