//! Settings API endpoints

use crate::AppState;
use axum::extract::State;
use axum::Json;

/// Effective configuration as JSON
pub async fn api_settings(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.backoffice.settings())
}
