use crate::api::MgmtState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    match state.health_service.ready().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
