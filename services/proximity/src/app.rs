//! HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! Static assets are mounted only when the configured directory exists, so
//! the API can run headless.
use crate::api;
use crate::api::error::REQUEST_ID_HEADER;
use crate::api::types::FeatureFlags;
use crate::observability;
use crate::store::SelectionStore;
use axum::Router;
use axum::http::HeaderName;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub features: FeatureFlags,
    pub store: Arc<dyn SelectionStore>,
    pub static_dir: Option<PathBuf>,
    pub cors_allow_any: bool,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SelectionStore>,
        static_dir: Option<PathBuf>,
        cors_allow_any: bool,
    ) -> Self {
        let static_dir = static_dir.filter(|dir| dir.is_dir());
        Self {
            api_version: "v1".to_string(),
            features: FeatureFlags {
                durable_storage: store.is_durable(),
                static_assets: static_dir.is_some(),
            },
            store,
            static_dir,
            cors_allow_any,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                request_id = %request_id
            );
            span.set_parent(parent);
            span
        });

    let mut router = Router::new()
        .route("/submit", axum::routing::post(api::submit::submit_selection))
        .route(
            "/api/results",
            axum::routing::get(api::results::country_results),
        )
        .route(
            "/v1/system/info",
            axum::routing::get(api::system::system_info),
        )
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route(
            "/v1/openapi.json",
            axum::routing::get(api::openapi::openapi_json),
        );

    if let Some(dir) = &state.static_dir {
        router = router
            .route_service("/", ServeFile::new(dir.join("index.html")))
            .route_service("/results", ServeFile::new(dir.join("results.html")))
            .nest_service("/static", ServeDir::new(dir));
    }

    let cors_allow_any = state.cors_allow_any;
    let router = router
        .with_state(state)
        // Outermost layer last: the id is assigned before tracing sees the request.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(trace_layer)
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid));

    if cors_allow_any {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
