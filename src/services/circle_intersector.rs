use crate::constants::DEGENERATE_SEGMENT_RAD;
use crate::models::coordinates::EARTH_RADIUS_M;
use crate::models::{Circle, Coordinates};

/// Decides whether a path enters a geofence.
///
/// Every vertex is tested first; only when none lies inside the circle are
/// the segments between consecutive vertices tested, so a route that crosses
/// the circle between two far-apart points still matches.
pub fn intersects(circle: &Circle, path: &[Coordinates]) -> bool {
    let radius_m = circle.radius.as_meters();

    if path.iter().any(|p| circle.center.distance_to_m(p) <= radius_m) {
        return true;
    }

    path.windows(2)
        .any(|w| distance_to_segment_m(&circle.center, &w[0], &w[1]) <= radius_m)
}

/// Shortest great-circle distance (meters) from `point` to the arc
/// `start`–`end`.
///
/// Uses cross-track / along-track decomposition: when the perpendicular foot
/// falls before `start` or past `end`, the nearer endpoint is the answer.
/// Coincident endpoints reduce to the point distance.
pub fn distance_to_segment_m(point: &Coordinates, start: &Coordinates, end: &Coordinates) -> f64 {
    let segment_rad = start.angular_distance_to(end);
    let to_start_rad = start.angular_distance_to(point);

    if segment_rad < DEGENERATE_SEGMENT_RAD || to_start_rad < DEGENERATE_SEGMENT_RAD {
        return EARTH_RADIUS_M * to_start_rad;
    }

    let relative_bearing = start.bearing_to(point) - start.bearing_to(end);

    // Behind the start of the arc
    if relative_bearing.cos() <= 0.0 {
        return EARTH_RADIUS_M * to_start_rad;
    }

    let cross_track_rad = (to_start_rad.sin() * relative_bearing.sin())
        .clamp(-1.0, 1.0)
        .asin();
    let along_track_rad = (to_start_rad.cos() / cross_track_rad.cos())
        .clamp(-1.0, 1.0)
        .acos();

    if along_track_rad >= segment_rad {
        return EARTH_RADIUS_M * end.angular_distance_to(point);
    }

    // Never report more than the endpoint distances
    let endpoint_rad = to_start_rad.min(end.angular_distance_to(point));
    EARTH_RADIUS_M * cross_track_rad.abs().min(endpoint_rad)
}
