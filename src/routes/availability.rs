use crate::error::{AppError, Result};
use crate::models::matching::{AvailabilityQuery, AvailabilityResponse};
use crate::models::DistanceKm;
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;

/// GET /buses/available?location=<lat,lng | place>&radius_km=<km>
/// List the buses whose morning or evening run passes within the radius
pub async fn find_available_buses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>> {
    let radius_km = query
        .radius_km
        .unwrap_or(state.matcher_config.default_radius_km);
    let radius = validate_radius(radius_km, state.matcher_config.max_radius_km)?;

    let location = state.resolver.resolve(&query.location).await?;
    location.validate().map_err(AppError::InvalidRequest)?;

    tracing::info!(
        lat = location.lat,
        lng = location.lng,
        radius_km,
        "Availability request: ({:.4}, {:.4}) within {}",
        location.lat,
        location.lng,
        radius
    );

    let buses = state.bus_repo.list_buses().await?;
    let (mut matches, address) = tokio::join!(
        state.matcher.find_matches(location, radius, &buses),
        state.geo_cache.reverse_geocode(&location)
    );

    matches.sort_by(|a, b| a.bus_name.cmp(&b.bus_name).then(a.bus_id.cmp(&b.bus_id)));

    Ok(Json(AvailabilityResponse {
        location,
        address,
        radius_km,
        buses: matches,
    }))
}

fn validate_radius(radius_km: f64, max_radius_km: f64) -> Result<DistanceKm> {
    let radius = DistanceKm::new(radius_km).map_err(AppError::InvalidRequest)?;
    if radius.as_km() <= 0.0 {
        return Err(AppError::InvalidRequest("radius_km must be positive".to_string()));
    }
    if radius.as_km() > max_radius_km {
        return Err(AppError::InvalidRequest(format!(
            "radius_km must not exceed {}",
            max_radius_km
        )));
    }
    Ok(radius)
}
