use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::AppState;

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "healthbot-web",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}
