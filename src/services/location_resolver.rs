use crate::cache::GeoCache;
use crate::error::{AppError, Result};
use crate::models::Coordinates;
use crate::services::providers::ProviderError;
use std::sync::Arc;

/// Turns a raw location token into coordinates.
///
/// `"lat,lng"` tokens are parsed directly; anything else is a place name and
/// goes through the geocode cache.
#[derive(Clone)]
pub struct LocationResolver {
    geo_cache: Arc<GeoCache>,
}

impl LocationResolver {
    pub fn new(geo_cache: Arc<GeoCache>) -> Self {
        LocationResolver { geo_cache }
    }

    pub async fn resolve(&self, token: &str) -> Result<Coordinates> {
        if let Some(coords) = parse_coordinates(token) {
            tracing::debug!(lat = coords.lat, lng = coords.lng, "Location token is a coordinate pair");
            return Ok(coords);
        }

        if token.trim().is_empty() {
            return Err(AppError::Resolution("empty location".to_string()));
        }

        match self.geo_cache.geocode(token).await {
            Ok(hit) => {
                tracing::debug!(
                    query = token,
                    address = %hit.formatted_address,
                    "Resolved place name to ({:.5}, {:.5})",
                    hit.coordinates.lat,
                    hit.coordinates.lng
                );
                Ok(hit.coordinates)
            }
            Err(e) => {
                if !matches!(*e, ProviderError::NoResults) {
                    tracing::warn!(query = token, error = %e, "Geocoding provider unavailable");
                }
                Err(AppError::Resolution(format!("not_geocodable: {}", e)))
            }
        }
    }
}

/// Parse `<number>,<number>` with optional whitespace around each number.
///
/// Numbers are plain decimals with an optional leading minus sign; exponents,
/// `inf` and `NaN` are not coordinates. Range checks are left to the caller.
pub fn parse_coordinates(token: &str) -> Option<Coordinates> {
    let (lat, lng) = token.split_once(',')?;
    Some(Coordinates {
        lat: parse_decimal(lat)?,
        lng: parse_decimal(lng)?,
    })
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let digits = s.strip_prefix('-').unwrap_or(s);

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    let valid = match frac_part {
        Some(f) => all_digits(int_part) && all_digits(f) && !(int_part.is_empty() && f.is_empty()),
        None => !int_part.is_empty() && all_digits(int_part),
    };

    if valid {
        s.parse().ok()
    } else {
        None
    }
}
