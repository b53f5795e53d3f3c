//! Health check endpoints for Kubernetes-style liveness and readiness checks.
//!
//! - `/livez` - Basic liveness check (immediate 200, no checks)
//! - `/readyz` - Readiness check (opens the customer table)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use tablecrud_core::storage::store_error_to_status_code;

use crate::state::AppState;

/// GET /livez - Basic liveness check.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /readyz - Readiness check.
///
/// Creates the customer table if it is absent. Returns 200 if the store
/// answered, 503 otherwise.
#[axum::debug_handler]
pub async fn readyz(State(state): State<AppState>) -> Response {
    match state.customers.open_table(&state.table).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "ready": true,
                "table": &*state.table,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(table = %state.table, error = %e, "Store not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "ready": false,
                    "table": &*state.table,
                    "status": store_error_to_status_code(&e),
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
