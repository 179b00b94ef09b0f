use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// Where the points of a [`RoutePath`] came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PathSource {
    /// Decoded road geometry from the directions provider
    Directions,
    /// The stop coordinates themselves, joined by straight segments
    StraightLine,
}

/// Ordered trajectory a bus follows through its stops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutePath {
    pub points: Vec<Coordinates>,
    pub source: PathSource,
    /// True when the directions provider was wanted but could not be used
    pub degraded: bool,
}

impl RoutePath {
    /// Road-following path decoded from the provider
    pub fn directions(points: Vec<Coordinates>) -> Self {
        RoutePath {
            points,
            source: PathSource::Directions,
            degraded: false,
        }
    }

    /// Straight-line path through the given points.
    /// `degraded` marks whether this was a fallback or simply all there was.
    pub fn straight_line(points: Vec<Coordinates>, degraded: bool) -> Self {
        RoutePath {
            points,
            source: PathSource::StraightLine,
            degraded,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Coordinates> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Coordinates> {
        self.points.last()
    }
}
