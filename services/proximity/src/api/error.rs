//! API error type and constructors.
//!
//! Every failure leaves the service as `{code, detail, request_id}`. Store
//! errors are logged here and replaced by a generic detail string.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use crate::validation::ValidationError;
use axum::Json;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, detail: &str) -> Self {
        Self {
            status,
            body: ErrorResponse {
                code: code.to_string(),
                detail: detail.to_string(),
                request_id: None,
            },
        }
    }

    /// Attach the request id assigned by the router, when there is one.
    pub fn with_request_id(mut self, headers: &HeaderMap) -> Self {
        self.body.request_id = request_id(headers);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        api_validation_error(err.code(), &err.to_string())
    }
}

pub fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Build a 400 Bad Request error with a caller-chosen code.
pub fn api_validation_error(code: &str, detail: &str) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, code, detail)
}

/// Build a 500 error from a store failure.
///
/// The store error is logged; clients only see `detail`.
pub fn api_internal(detail: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "selection store error");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", detail)
}
