//! OpenAPI document for the proximity HTTP API.
use crate::aggregate::{CountryResult, ProximityAverage};
use crate::api::{
    results, submit, system,
    types::{
        ErrorResponse, FeatureFlags, HealthStatus, ProximityInput, SubmitRequest, SubmitResponse,
        SystemInfo,
    },
};
use crate::model::ProximityLabel;
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "proximity",
        version = "v1",
        description = "Proximity selection and aggregation HTTP API"
    ),
    paths(
        submit::submit_selection,
        results::country_results,
        system::system_info,
        system::system_health
    ),
    components(schemas(
        ProximityLabel,
        ProximityInput,
        SubmitRequest,
        SubmitResponse,
        ProximityAverage,
        CountryResult,
        FeatureFlags,
        SystemInfo,
        HealthStatus,
        ErrorResponse
    )),
    tags(
        (name = "selections", description = "Submitting and aggregating selections"),
        (name = "system", description = "System and discovery endpoints")
    )
)]
pub struct ApiDoc;

pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
