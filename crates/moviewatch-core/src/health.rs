use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Handler for `GET /health`. Liveness only; the database is not probed.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}
