//! System endpoints for probes and operators.
//!
//! Health checks must be fast and side-effect free; system info is built from
//! in-memory state only.
use crate::api::error::{ApiError, api_internal};
use crate::api::types::{ErrorResponse, HealthStatus, SystemInfo};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;

pub const SERVICE_NAME: &str = "proximity";

#[utoipa::path(
    get,
    path = "/v1/system/info",
    tag = "system",
    responses(
        (status = 200, description = "Service identity and capabilities", body = SystemInfo)
    )
)]
/// Return service identity, storage backend, and feature flags.
pub(crate) async fn system_info(State(state): State<AppState>) -> Json<SystemInfo> {
    Json(SystemInfo {
        service: SERVICE_NAME.to_string(),
        api_version: state.api_version.clone(),
        storage_backend: state.store.backend_name().to_string(),
        features: state.features.clone(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/system/health",
    tag = "system",
    responses(
        (status = 200, description = "Service health", body = HealthStatus),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
/// Probe the store and report `ok` when it answers.
pub(crate) async fn system_health(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<HealthStatus>, ApiError> {
    if let Err(err) = state.store.health_check().await {
        return Err(api_internal("storage unavailable", &err).with_request_id(&headers));
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
    }))
}
