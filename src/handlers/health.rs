use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use std::sync::Arc;
use tracing::error;

use crate::models::dtos::HealthStatus;
use crate::models::AppState;

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    summary = "Health check endpoint",
    description = "Returns 200 with a healthy status while the service can reach its database. \
                   Intended for load balancers and uptime probes; keeps the check to a single \
                   trivial query.",
    operation_id = "healthCheck",
    responses(
        (status = 200, description = "Service is healthy and operational", body = HealthStatus),
        (status = 503, description = "Service is unhealthy, database unreachable", body = HealthStatus),
    ),
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    match probe_database(&state) {
        Ok(()) => Json(HealthStatus {
            status: StatusCode::OK.to_string(),
            message: format!(
                "API is healthy ({} event subscribers)",
                state.events.client_count()
            ),
        }),
        Err(reason) => Json(HealthStatus {
            status: StatusCode::SERVICE_UNAVAILABLE.to_string(),
            message: reason,
        }),
    }
}

fn probe_database(state: &AppState) -> Result<(), String> {
    let mut conn = state.db.get().map_err(|e| {
        error!("Health check DB connection failed: {}", e);
        "Database connection failed".to_string()
    })?;
    diesel::sql_query("SELECT 1")
        .execute(&mut conn)
        .map_err(|e| {
            error!("Health check DB query failed: {}", e);
            "Database probe query failed".to_string()
        })?;
    Ok(())
}
