use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Directional run of a bus. Every bus runs once in each period per day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Evening,
}

impl Period {
    pub const ALL: [Period; 2] = [Period::Morning, Period::Evening];
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Morning => write!(f, "morning"),
            Period::Evening => write!(f, "evening"),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" | "am" => Ok(Period::Morning),
            "evening" | "pm" => Ok(Period::Evening),
            _ => Err(format!("Invalid period: '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stop {
    pub name: String,
    pub coordinates: Coordinates,
    pub period: Period,
    /// 1-based position within the (bus, period) run
    pub order: i32,
}

impl Stop {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64, period: Period, order: i32) -> Self {
        Stop {
            name: name.into(),
            coordinates: Coordinates { lat, lng },
            period,
            order,
        }
    }
}

/// A bus as read from the store: identity plus every stop of both runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bus {
    pub id: Uuid,
    pub name: String,
    pub stops: Vec<Stop>,
}

impl Bus {
    pub fn new(name: impl Into<String>, stops: Vec<Stop>) -> Self {
        Bus {
            id: Uuid::new_v4(),
            name: name.into(),
            stops,
        }
    }

    /// Stops of one run, ordered by their `order` field
    pub fn stops_for(&self, period: Period) -> Vec<&Stop> {
        let mut stops: Vec<&Stop> = self.stops.iter().filter(|s| s.period == period).collect();
        stops.sort_by_key(|s| s.order);
        stops
    }
}

/// Check that an ordered stop run is usable for path building.
///
/// Rejects empty names, orders below 1 and coordinates that are non-finite
/// or out of range. Order uniqueness is the store's responsibility.
pub fn validate_stop_run(stops: &[&Stop]) -> Result<(), String> {
    for stop in stops {
        if stop.name.trim().is_empty() {
            return Err(format!("stop #{} has no name", stop.order));
        }
        if stop.order < 1 {
            return Err(format!("stop '{}' has invalid order {}", stop.name, stop.order));
        }
        stop.coordinates
            .validate()
            .map_err(|e| format!("stop '{}': {}", stop.name, e))?;
    }

    Ok(())
}
