//! REST API handlers

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApiStatus {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// Liveness banner
pub async fn api_status() -> impl IntoResponse {
    Json(ApiStatus {
        status: "ok",
        message: "BodyClone API is running",
    })
}

pub async fn health() -> impl IntoResponse {
    Json(Health { status: "healthy" })
}

/// Viewer constants as served to the frontend
pub async fn get_viewer_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.viewer.clone())
}
