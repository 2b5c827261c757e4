//! Service health for load balancers and the deploy pipeline.

use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
///
/// Answers in the regular envelope; an unreachable database turns the
/// response into a 503 so orchestrators stop routing to this instance.
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthStatus> {
    let db_healthy = match vidhub_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            false
        }
    };

    let status = HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    };
    if db_healthy {
        ApiResponse::ok(status, "OK")
    } else {
        ApiResponse::new(StatusCode::SERVICE_UNAVAILABLE, status, "Database unreachable")
    }
}
