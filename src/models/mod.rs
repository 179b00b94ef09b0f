pub mod bus;
pub mod coordinates;
pub mod distance;
pub mod matching;
pub mod route;

pub use bus::{Bus, Period, Stop};
pub use coordinates::Coordinates;
pub use distance::{DistanceKm, DistanceMeters, RadiusMeters};
pub use matching::{Circle, MatchResult, PeriodMatch};
pub use route::{PathSource, RoutePath};
