use crate::models::bus::validate_stop_run;
use crate::models::{Bus, Circle, Coordinates, DistanceKm, MatchResult, PeriodMatch, Period, Stop};
use crate::services::circle_intersector;
use crate::services::path_provider::PathProvider;
use futures::stream::{self, StreamExt};
use tracing::{debug, instrument, warn};

/// Finds the buses whose morning or evening run passes near a location.
#[derive(Clone)]
pub struct RouteMatcher {
    path_provider: PathProvider,
    concurrency: usize,
}

impl RouteMatcher {
    pub fn new(path_provider: PathProvider, concurrency: usize) -> Self {
        RouteMatcher {
            path_provider,
            concurrency: concurrency.max(1),
        }
    }

    /// Match every bus against the circle around `user_location`.
    ///
    /// Buses are processed concurrently (bounded by the configured fan-out)
    /// and results come back in completion order. One bad bus never fails
    /// the batch.
    pub async fn find_matches(
        &self,
        user_location: Coordinates,
        radius: DistanceKm,
        buses: &[Bus],
    ) -> Vec<MatchResult> {
        let circle = Circle::from_km(user_location, radius);

        // Built eagerly: a borrowing `.map` closure on the stream fails the handler's Send bound
        let pending: Vec<_> = buses.iter().map(|bus| self.match_bus(&circle, bus)).collect();
        let results: Vec<Option<MatchResult>> = stream::iter(pending)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let matches: Vec<MatchResult> = results.into_iter().flatten().collect();

        tracing::info!(
            buses = buses.len(),
            matched = matches.len(),
            radius = %radius,
            "Matched {} of {} buses within {}",
            matches.len(),
            buses.len(),
            radius
        );

        matches
    }

    #[instrument(skip(self, circle, bus), fields(bus = %bus.name))]
    async fn match_bus(&self, circle: &Circle, bus: &Bus) -> Option<MatchResult> {
        let nearby_stops = nearby_stop_names(circle, &bus.stops);

        let runs: Vec<(Period, Vec<&Stop>)> = Period::ALL
            .iter()
            .map(|&period| (period, bus.stops_for(period)))
            .filter(|(_, stops)| !stops.is_empty())
            .collect();

        if let Err(reason) = runs.iter().try_for_each(|(_, stops)| validate_stop_run(stops)) {
            warn!(
                bus_id = %bus.id,
                reason = %reason,
                "Malformed stop data for bus '{}', falling back to stop-only radius check",
                bus.name
            );
            return stop_only_match(circle, bus, &runs, nearby_stops);
        }

        let mut result = MatchResult {
            bus_id: bus.id,
            bus_name: bus.name.clone(),
            morning: None,
            evening: None,
            nearby_stop_count: nearby_stops.len(),
            nearby_stops,
            degraded: false,
        };

        for (period, stops) in &runs {
            let path = self.path_provider.build_path(stops).await;
            let matched = circle_intersector::intersects(circle, &path.points);

            debug!(
                period = %period,
                matched,
                path_points = path.len(),
                degraded = path.degraded,
                "{} run checked against geofence",
                period
            );

            result.degraded |= path.degraded;
            let period_match = PeriodMatch {
                matched,
                path: Some(path),
            };
            match period {
                Period::Morning => result.morning = Some(period_match),
                Period::Evening => result.evening = Some(period_match),
            }
        }

        (result.morning_matched() || result.evening_matched()).then_some(result)
    }
}

/// Names of the stops lying inside the circle; invalid stops are skipped
fn nearby_stop_names(circle: &Circle, stops: &[Stop]) -> Vec<String> {
    stops
        .iter()
        .filter(|s| s.coordinates.validate().is_ok() && circle.contains(&s.coordinates))
        .map(|s| s.name.clone())
        .collect()
}

/// Degraded check for a bus whose stop records can't be turned into paths:
/// a run matches when one of its usable stops is inside the circle.
fn stop_only_match(
    circle: &Circle,
    bus: &Bus,
    runs: &[(Period, Vec<&Stop>)],
    nearby_stops: Vec<String>,
) -> Option<MatchResult> {
    if nearby_stops.is_empty() {
        return None;
    }

    let mut result = MatchResult {
        bus_id: bus.id,
        bus_name: bus.name.clone(),
        morning: None,
        evening: None,
        nearby_stop_count: nearby_stops.len(),
        nearby_stops,
        degraded: true,
    };

    for (period, stops) in runs {
        let matched = stops
            .iter()
            .any(|s| s.coordinates.validate().is_ok() && circle.contains(&s.coordinates));
        let period_match = Some(PeriodMatch { matched, path: None });
        match period {
            Period::Morning => result.morning = period_match,
            Period::Evening => result.evening = period_match,
        }
    }

    Some(result)
}
