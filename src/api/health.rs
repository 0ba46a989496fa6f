use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::api::AppState;

/// Liveness plus a fresh backend probe, so operators can see when the
/// service is answering from the bundled catalog.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let backend = if state.repo.backend_available().await {
        "up"
    } else {
        "down"
    };

    Json(json!({
        "status": "ok",
        "backend": backend,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
