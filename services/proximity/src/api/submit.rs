//! Submission endpoint.
//!
//! # Key invariants
//! - Validation completes before the store is touched.
//! - The write is a single `upsert_selection` call; there is no separate
//!   existence check.
use crate::api::error::{ApiError, api_internal, api_validation_error};
use crate::api::types::{ErrorResponse, SubmitRequest, SubmitResponse};
use crate::app::AppState;
use crate::validation::parse_submission;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use serde_json::Value;

fn record(outcome: &'static str) {
    metrics::counter!("proximity_submissions_total", "outcome" => outcome).increment(1);
}

#[utoipa::path(
    post,
    path = "/submit",
    tag = "selections",
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Selection created or updated", body = SubmitResponse),
        (status = 400, description = "Payload failed validation", body = ErrorResponse),
        (status = 500, description = "Selection could not be saved", body = ErrorResponse)
    )
)]
/// Create or replace the caller's selection.
pub(crate) async fn submit_selection(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        record("rejected");
        api_validation_error("invalid_json", &rejection.body_text()).with_request_id(&headers)
    })?;

    let submission = parse_submission(&payload).map_err(|err| {
        record("rejected");
        tracing::debug!(code = err.code(), "submission rejected");
        ApiError::from(err).with_request_id(&headers)
    })?;

    let outcome = state
        .store
        .upsert_selection(submission)
        .await
        .map_err(|err| {
            record("failed");
            api_internal("Error saving selection", &err).with_request_id(&headers)
        })?;

    record(if outcome.is_created() { "created" } else { "updated" });
    tracing::info!(
        id = outcome.selection().id,
        created = outcome.is_created(),
        "selection stored"
    );
    Ok(Json(SubmitResponse {
        id: outcome.selection().id,
        message: outcome.message().to_string(),
    }))
}
