pub mod availability;
pub mod debug;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/buses/available", get(availability::find_available_buses))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
