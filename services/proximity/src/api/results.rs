use crate::aggregate::{CountryResult, aggregate_by_country};
use crate::api::error::{ApiError, api_internal};
use crate::api::types::ErrorResponse;
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;

#[utoipa::path(
    get,
    path = "/api/results",
    tag = "selections",
    responses(
        (status = 200, description = "Per-country averages", body = [CountryResult]),
        (status = 500, description = "Selections could not be read", body = ErrorResponse)
    )
)]
/// Aggregate every stored selection by country.
pub(crate) async fn country_results(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<CountryResult>>, ApiError> {
    let selections = state.store.list_selections().await.map_err(|err| {
        metrics::counter!("proximity_results_requests_total", "outcome" => "failed").increment(1);
        api_internal("Error fetching results", &err).with_request_id(&headers)
    })?;

    metrics::counter!("proximity_results_requests_total", "outcome" => "ok").increment(1);
    Ok(Json(aggregate_by_country(&selections)))
}
