//! Health and readiness endpoints
//!
//! `GET /health` and `GET /healthz` answer 200 as soon as the process serves
//! requests. `GET /ready` answers 200 only after the background bootstrap drain
//! has completed and 503 before that. `GET /info` reports the flag and the
//! server time.

use crate::common::ApiResponse;
use crate::lifecycle::Readiness;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const ENDPOINT_HEALTH: &str = "/health";
pub const ENDPOINT_HEALTHZ: &str = "/healthz";
pub const ENDPOINT_READY: &str = "/ready";
pub const ENDPOINT_INFO: &str = "/info";

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub ready: bool,
    pub time: DateTime<Utc>,
}

/// Probe routes backed by `readiness`.
///
/// The router has its state applied already, so it merges into any host router.
pub fn router(readiness: Readiness) -> Router {
    Router::new()
        .route(ENDPOINT_HEALTH, get(health))
        .route(ENDPOINT_HEALTHZ, get(health))
        .route(ENDPOINT_READY, get(ready))
        .route(ENDPOINT_INFO, get(info))
        .with_state(readiness)
}

async fn health() -> ApiResponse<()> {
    ApiResponse::ok()
}

async fn ready(State(readiness): State<Readiness>) -> ApiResponse<bool> {
    if readiness.is_ready() {
        ApiResponse::success(true)
    } else {
        ApiResponse::error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Server is running but not yet ready to handle requests",
        )
    }
}

async fn info(State(readiness): State<Readiness>) -> ApiResponse<InfoResponse> {
    ApiResponse::success(InfoResponse {
        ready: readiness.is_ready(),
        time: Utc::now(),
    })
}
