use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Estado del store segun el ultimo probe del monitor
    pub cache: String,
}

impl HealthResponse {
    pub fn new(cache_healthy: bool) -> Self {
        Self {
            status: "UP".to_string(),
            cache: if cache_healthy { "UP" } else { "DOWN" }.to_string(),
        }
    }
}

/// GET /health
/// El servicio responde aunque el store este caido.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.store().is_healthy()))
}
