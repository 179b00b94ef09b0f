use bus_radar::cache::GeoCache;
use bus_radar::models::{Bus, Coordinates, DistanceKm, PathSource, Period, Stop};
use bus_radar::services::location_resolver::LocationResolver;
use bus_radar::AppError;
use std::sync::atomic::Ordering;
use std::sync::Arc;

mod common;

use common::{campus_bus, matcher_with, FakeMaps};

#[tokio::test]
async fn stop_on_center_matches_with_straight_line_fallback() {
    let maps = Arc::new(FakeMaps::unavailable());
    let center = Coordinates::new(16.5286, 80.6393).unwrap();

    let results = matcher_with(maps.clone())
        .find_matches(center, DistanceKm::new(1.5).unwrap(), &[campus_bus()])
        .await;

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result.evening_matched());
    assert!(result.morning.is_none());
    assert!(result.degraded);
    assert_eq!(result.nearby_stops, vec!["Campus".to_string()]);
    assert_eq!(result.nearby_stop_count, 1);

    let path = result.evening.as_ref().unwrap().path.as_ref().unwrap();
    assert_eq!(path.source, PathSource::StraightLine);
    assert_eq!(path.len(), 3);
    assert_eq!(maps.route_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn far_circle_does_not_match() {
    let maps = Arc::new(FakeMaps::unavailable());
    let far = Coordinates::new(0.0, 0.0).unwrap();

    let results = matcher_with(maps)
        .find_matches(far, DistanceKm::new(0.1).unwrap(), &[campus_bus()])
        .await;

    assert!(results.is_empty());
}

#[tokio::test]
async fn road_geometry_decides_match_when_available() {
    // Road bends through (40.7, -120.95); the straight line between the two
    // stops passes far to the west of it.
    let bus = Bus::new(
        "Long haul",
        vec![
            Stop::new("South", 38.5, -120.2, Period::Morning, 1),
            Stop::new("North", 43.252, -126.453, Period::Morning, 2),
        ],
    );
    let center = Coordinates::new(40.7, -120.95).unwrap();
    let radius = DistanceKm::new(0.5).unwrap();

    let with_roads = Arc::new(FakeMaps::unavailable().with_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@"));
    let results = matcher_with(with_roads)
        .find_matches(center, radius, std::slice::from_ref(&bus))
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].morning_matched());
    assert!(!results[0].degraded);
    assert_eq!(results[0].nearby_stop_count, 0);
    let path = results[0].morning.as_ref().unwrap().path.as_ref().unwrap();
    assert_eq!(path.source, PathSource::Directions);

    let without_roads = Arc::new(FakeMaps::unavailable());
    let results = matcher_with(without_roads)
        .find_matches(center, radius, &[bus])
        .await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn one_malformed_bus_does_not_fail_the_batch() {
    let maps = Arc::new(FakeMaps::unavailable());
    let broken = Bus::new(
        "Broken",
        vec![
            Stop::new("Ghost", f64::NAN, 80.64, Period::Morning, 1),
            Stop::new("Far", 17.0, 81.0, Period::Morning, 2),
        ],
    );
    let center = Coordinates::new(16.5286, 80.6393).unwrap();

    let results = matcher_with(maps)
        .find_matches(center, DistanceKm::new(1.5).unwrap(), &[broken, campus_bus()])
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].bus_name, "Route 12");
}

#[tokio::test]
async fn many_buses_fan_out_and_all_report() {
    let maps = Arc::new(FakeMaps::unavailable());
    let buses: Vec<Bus> = (0..20).map(|_| campus_bus()).collect();
    let center = Coordinates::new(16.5286, 80.6393).unwrap();

    let results = matcher_with(maps.clone())
        .find_matches(center, DistanceKm::new(1.5).unwrap(), &buses)
        .await;

    assert_eq!(results.len(), 20);
    assert_eq!(maps.route_calls.load(Ordering::SeqCst), 20);
}

#[tokio::test]
async fn resolver_parses_coordinates_without_geocoding() {
    let maps = Arc::new(FakeMaps::unavailable());
    let resolver = LocationResolver::new(Arc::new(GeoCache::new(maps.clone(), 10)));

    let coords = resolver.resolve("16.5062, 80.6480").await.unwrap();
    assert_eq!(coords, Coordinates::new(16.5062, 80.6480).unwrap());
    assert_eq!(maps.geocode_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn resolver_geocodes_place_names_once() {
    let maps = Arc::new(FakeMaps::unavailable().with_place("benz circle", 16.5062, 80.6480));
    let resolver = LocationResolver::new(Arc::new(GeoCache::new(maps.clone(), 10)));

    let first = resolver.resolve("Benz Circle").await.unwrap();
    let second = resolver.resolve("  BENZ CIRCLE").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(maps.geocode_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn resolver_fails_when_provider_unavailable() {
    let maps = Arc::new(FakeMaps::unavailable());
    let resolver = LocationResolver::new(Arc::new(GeoCache::new(maps, 10)));

    let err = resolver.resolve("abc").await.unwrap_err();
    assert!(matches!(err, AppError::Resolution(_)));
}

#[tokio::test]
async fn resolver_fails_on_unknown_place() {
    let maps = Arc::new(FakeMaps::unavailable().with_place("benz circle", 16.5062, 80.6480));
    let resolver = LocationResolver::new(Arc::new(GeoCache::new(maps, 10)));

    let err = resolver.resolve("Atlantis").await.unwrap_err();
    assert!(matches!(err, AppError::Resolution(ref m) if m.contains("not_geocodable")));
}
