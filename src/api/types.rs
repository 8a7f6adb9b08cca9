//! API request and response bodies.
//!
//! Field names are camelCase to match the stored records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default number of periods for `GET /api/sensors/{id}/forecast`.
pub const DEFAULT_SENSOR_FORECAST_PERIODS: usize = 6;

/// Largest forecast horizon either forecast route will compute.
pub const MAX_FORECAST_PERIODS: usize = 1000;

/// JSON error body returned for all non-2xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `POST /api/simulate`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulateRequest {
    pub city_id: Option<String>,
}

/// `POST /api/propose`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProposeRequest {
    pub building_id: Option<String>,
    pub city_id: Option<String>,
}

/// `POST /api/forecast`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastRequest {
    pub historical_values: Option<Vec<f64>>,
    pub periods: Option<usize>,
    pub alpha: Option<f64>,
}

/// Query string for `GET /api/sensors/{id}/forecast`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForecastQuery {
    pub periods: Option<usize>,
    pub alpha: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub forecast: Vec<f64>,
}

/// `POST /api/chat`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub city_id: Option<String>,
    /// Metrics snapshot to ground the answer in. When absent, the latest
    /// saved simulation of `cityId` is used.
    pub context_metrics: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Treats a missing or blank string field as absent.
pub(crate) fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}
