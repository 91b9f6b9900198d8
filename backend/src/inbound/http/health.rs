//! Health probes.
//!
//! `/health/ready` reports whether the listener is accepting users API
//! traffic; `/health/live` answers 200 for as long as the process can serve a
//! request at all. Neither touches the user store. Probe responses carry
//! `Cache-Control: no-store`.
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, get, web};

/// Readiness flag shared between the server bootstrap and the probe handlers.
///
/// Starts not ready. `create_server` flips it once the listener is bound and
/// the user store has been selected.
#[derive(Debug, Default)]
pub struct HealthState {
    ready: AtomicBool,
}

impl HealthState {
    /// Create a state that is not yet ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start reporting ready. Idempotent.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Whether readiness has been reported.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

fn uncached(status: StatusCode) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness probe: 503 until the server is bound, then 200.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Users API is accepting traffic"),
        (status = 503, description = "Server is still starting")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        uncached(StatusCode::OK)
    } else {
        uncached(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Liveness probe: 200 whenever a worker can answer.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses((status = 200, description = "Process is serving requests"))
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    uncached(StatusCode::OK)
}
