//! Liveness probe.

use axum::Json;
use chrono::Utc;
use common::HealthStatus;

/// GET /api/health — always `ok`, stamped with the current time.
pub async fn check() -> Json<HealthStatus> {
    metrics::counter!("health_checks_total").increment(1);
    Json(HealthStatus::ok(Utc::now()))
}
