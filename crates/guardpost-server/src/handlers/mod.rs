//! HTTP route handlers for the agent server.

pub mod chat;

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use guardpost_core::ToolSchema;

use crate::state::AppState;

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// Lists the tool catalog currently advertised to the model.
pub async fn tools(State(state): State<Arc<AppState>>) -> Json<Vec<ToolSchema>> {
    Json(state.driver.catalog().to_vec())
}
