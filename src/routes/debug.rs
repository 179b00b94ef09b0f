use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Check if services are working
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    // Check bus store
    match state.bus_repo.count().await {
        Ok(count) => {
            status["checks"]["store"] = json!("ok");
            status["checks"]["bus_count"] = json!(count);
        }
        Err(e) => {
            status["checks"]["store"] = json!({"error": e.to_string()});
            status["status"] = json!("error");
        }
    }

    status["checks"]["geocode_cache"] = json!(state.geo_cache.stats());

    Json(status)
}
