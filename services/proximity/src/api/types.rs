use crate::model::ProximityLabel;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct FeatureFlags {
    pub durable_storage: bool,
    pub static_assets: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub service: String,
    pub api_version: String,
    pub storage_backend: String,
    pub features: FeatureFlags,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ErrorResponse {
    pub code: String,
    pub detail: String,
    pub request_id: Option<String>,
}

/// One labelled rating inside a submission.
///
/// Documents the accepted body shape; the handler itself decodes into
/// `serde_json::Value` so every validation failure gets its own message.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProximityInput {
    pub label: ProximityLabel,
    #[schema(minimum = 1, maximum = 10)]
    pub proximity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SubmitRequest {
    pub user_id: String,
    pub country: String,
    pub proximities: Vec<ProximityInput>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct SubmitResponse {
    pub id: i64,
    pub message: String,
}
