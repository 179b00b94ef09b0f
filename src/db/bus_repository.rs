use crate::error::Result;
use crate::models::{Bus, Coordinates, Period, Stop};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Shared row-to-Bus conversion (one row per stop, LEFT JOINed onto its bus)
// ---------------------------------------------------------------------------

/// Raw joined fields before validation. Stop columns are all NULL for a bus
/// with no stops.
#[derive(sqlx::FromRow)]
pub(super) struct RawStopRow {
    pub bus_id: Uuid,
    pub bus_name: String,
    pub stop_name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub period: Option<String>,
    pub stop_order: Option<i32>,
}

impl RawStopRow {
    /// `None` for the NULL row of a stop-less bus or an unknown period.
    /// Missing coordinates become NaN so the matcher treats the bus as
    /// malformed instead of silently dropping the stop.
    fn into_stop(self) -> Option<Stop> {
        let period_raw = self.period?;
        let period: Period = match period_raw.parse() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(bus_id = %self.bus_id, "Skipping stop row: {}", e);
                return None;
            }
        };

        if self.lat.is_none() || self.lng.is_none() {
            tracing::warn!(
                bus_id = %self.bus_id,
                stop = ?self.stop_name,
                "Stop row without coordinates"
            );
        }

        Some(Stop {
            name: self.stop_name.unwrap_or_default(),
            coordinates: Coordinates {
                lat: self.lat.unwrap_or(f64::NAN),
                lng: self.lng.unwrap_or(f64::NAN),
            },
            period,
            order: self.stop_order.unwrap_or(0),
        })
    }
}

/// Group joined rows into buses, keeping first-seen bus order
pub(super) fn group_rows(rows: Vec<RawStopRow>) -> Vec<Bus> {
    let mut buses: Vec<Bus> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        let slot = *index.entry(row.bus_id).or_insert_with(|| {
            buses.push(Bus {
                id: row.bus_id,
                name: row.bus_name.clone(),
                stops: Vec::new(),
            });
            buses.len() - 1
        });

        if let Some(stop) = row.into_stop() {
            buses[slot].stops.push(stop);
        }
    }

    buses
}

/// Read-only view of the bus/stop store
#[async_trait]
pub trait BusRepository: Send + Sync {
    /// Every bus with all of its stops (both periods)
    async fn list_buses(&self) -> Result<Vec<Bus>>;

    async fn count(&self) -> Result<i64>;
}

pub struct PgBusRepository {
    pool: sqlx::PgPool,
}

impl PgBusRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusRepository for PgBusRepository {
    async fn list_buses(&self) -> Result<Vec<Bus>> {
        let rows = sqlx::query_as::<_, RawStopRow>(
            "SELECT b.id AS bus_id, b.name AS bus_name,
                    s.name AS stop_name, s.lat, s.lng, s.period, s.stop_order
             FROM buses b
             LEFT JOIN stops s ON s.bus_id = b.id
             ORDER BY b.name, b.id, s.period, s.stop_order",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(group_rows(rows))
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM buses")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Store kept in process memory; used for fixtures and tests
pub struct InMemoryBusRepository {
    buses: RwLock<Vec<Bus>>,
}

impl InMemoryBusRepository {
    pub fn new(buses: Vec<Bus>) -> Self {
        Self {
            buses: RwLock::new(buses),
        }
    }
}

#[async_trait]
impl BusRepository for InMemoryBusRepository {
    async fn list_buses(&self) -> Result<Vec<Bus>> {
        Ok(self.buses.read().await.clone())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.buses.read().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(bus_id: Uuid, stop: Option<(&str, f64, f64, &str, i32)>) -> RawStopRow {
        RawStopRow {
            bus_id,
            bus_name: "Route 3".to_string(),
            stop_name: stop.map(|s| s.0.to_string()),
            lat: stop.map(|s| s.1),
            lng: stop.map(|s| s.2),
            period: stop.map(|s| s.3.to_string()),
            stop_order: stop.map(|s| s.4),
        }
    }

    #[test]
    fn groups_rows_by_bus() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let buses = group_rows(vec![
            row(a, Some(("Campus", 16.52, 80.63, "morning", 1))),
            row(a, Some(("Benz Circle", 16.50, 80.64, "morning", 2))),
            row(b, None),
            row(a, Some(("Campus", 16.52, 80.63, "evening", 1))),
        ]);

        assert_eq!(buses.len(), 2);
        assert_eq!(buses[0].id, a);
        assert_eq!(buses[0].stops.len(), 3);
        assert_eq!(buses[0].stops_for(Period::Morning).len(), 2);
        assert!(buses[1].stops.is_empty());
    }

    #[test]
    fn unknown_period_is_skipped() {
        let a = Uuid::new_v4();
        let buses = group_rows(vec![row(a, Some(("Campus", 16.52, 80.63, "noon", 1)))]);
        assert!(buses[0].stops.is_empty());
    }

    #[test]
    fn missing_coordinates_become_invalid() {
        let mut r = row(Uuid::new_v4(), Some(("Campus", 0.0, 0.0, "morning", 1)));
        r.lat = None;
        let stop = r.into_stop().unwrap();
        assert!(stop.coordinates.validate().is_err());
    }

    #[tokio::test]
    async fn in_memory_repository_lists_buses() {
        let repo = InMemoryBusRepository::new(vec![Bus::new("Route 1", vec![])]);
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.list_buses().await.unwrap()[0].name, "Route 1");
    }
}
