//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;

use super::AppState;
use super::error::ApiError;
use super::types::{
    ChatRequest, ChatResponse, DEFAULT_SENSOR_FORECAST_PERIODS, ForecastQuery, ForecastRequest,
    ForecastResponse, MAX_FORECAST_PERIODS, ProposeRequest, SimulateRequest, present,
};
use crate::forecast::{DEFAULT_ALPHA, ExponentialSmoothing};
use crate::model::{Building, City, Layer, NewCity, NewLayer, NewReading, Sensor};
use crate::proposal::{Proposal, generate_proposal};
use crate::sim::{SimulationResult, estimate};
use crate::store::Stored;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// `GET /api/cities` → 200 + `[City]`
pub async fn list_cities(State(state): State<Arc<AppState>>) -> ApiResult<Vec<City>> {
    Ok(Json(state.store.cities()?))
}

/// `GET /api/cities/{id}` → 200 + `City`, 404 if unknown
pub async fn get_city(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<City> {
    state
        .store
        .city(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("City not found"))
}

/// `POST /api/cities` → 201 + `City`, 400 on invalid body
pub async fn create_city(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewCity>, JsonRejection>,
) -> Result<(StatusCode, Json<City>), ApiError> {
    let Json(new) = payload?;
    new.validate()?;
    let city = state.store.create_city(new)?;
    tracing::info!(id = %city.id, name = %city.name, "city created");
    Ok((StatusCode::CREATED, Json(city)))
}

/// `GET /api/cities/{id}/layers` → 200 + `[Layer]`
pub async fn list_layers(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<String>,
) -> ApiResult<Vec<Layer>> {
    Ok(Json(state.store.layers(&city_id)?))
}

/// `POST /api/layers` → 201 + `Layer`, 400 on invalid body
pub async fn create_layer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewLayer>, JsonRejection>,
) -> Result<(StatusCode, Json<Layer>), ApiError> {
    let Json(new) = payload?;
    new.validate()?;
    let layer = state.store.create_layer(new)?;
    Ok((StatusCode::CREATED, Json(layer)))
}

/// `GET /api/cities/{id}/buildings` → 200 + `[Building]`
pub async fn list_buildings(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<String>,
) -> ApiResult<Vec<Building>> {
    Ok(Json(state.store.buildings(&city_id)?))
}

/// `GET /api/buildings/{id}` → 200 + `Building`, 404 if unknown
pub async fn get_building(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Building> {
    state
        .store
        .building(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Building not found"))
}

/// `GET /api/cities/{id}/sensors` → 200 + `[Sensor]`
pub async fn list_sensors(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<String>,
) -> ApiResult<Vec<Sensor>> {
    Ok(Json(state.store.sensors(&city_id)?))
}

/// Appends a reading stamped with the server time.
///
/// `POST /api/sensors/{id}/readings` → 200 + updated `Sensor`
/// 400 on invalid body, 404 for an unknown sensor
pub async fn add_reading(
    State(state): State<Arc<AppState>>,
    Path(sensor_id): Path<String>,
    payload: Result<Json<NewReading>, JsonRejection>,
) -> ApiResult<Sensor> {
    let Json(new) = payload?;
    new.validate()?;
    let sensor = state
        .store
        .add_sensor_reading(&sensor_id, new.stamp(Utc::now()))?;
    Ok(Json(sensor))
}

/// Forecasts a sensor's next values from its reading history.
///
/// `GET /api/sensors/{id}/forecast?periods=N&alpha=A` → 200 + `{forecast}`
pub async fn sensor_forecast(
    State(state): State<Arc<AppState>>,
    Path(sensor_id): Path<String>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
) -> ApiResult<ForecastResponse> {
    let Query(query) = query?;
    let sensor = state
        .store
        .sensor(&sensor_id)?
        .ok_or_else(|| ApiError::not_found("Sensor not found"))?;
    let model = ExponentialSmoothing::new(query.alpha.unwrap_or(DEFAULT_ALPHA))?;
    let periods = bounded_periods(query.periods.unwrap_or(DEFAULT_SENSOR_FORECAST_PERIODS))?;
    Ok(Json(ForecastResponse {
        forecast: model.forecast(&sensor.values(), periods),
    }))
}

/// Runs the estimator for a city and saves the result.
///
/// `POST /api/simulate` `{cityId}` → 200 + stored `SimulationResult`
/// 400 without `cityId` or when the city has no buildings, 404 for an unknown city
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> ApiResult<Stored<SimulationResult>> {
    let Json(req) = payload?;
    let city_id = present(req.city_id).ok_or_else(|| ApiError::bad_request("City ID required"))?;
    let city = state
        .store
        .city(&city_id)?
        .ok_or_else(|| ApiError::not_found("City not found"))?;
    let buildings = state.store.buildings(&city_id)?;

    let result = estimate(&city, &buildings)?;
    let stored = state.store.save_simulation(result)?;
    tracing::info!(
        city = %city_id,
        buildings = buildings.len(),
        average_stress = stored.record.average_stress,
        "simulation saved"
    );
    Ok(Json(stored))
}

/// `GET /api/cities/{id}/simulations` → 200 + `[Stored<SimulationResult>]`
pub async fn list_simulations(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<String>,
) -> ApiResult<Vec<Stored<SimulationResult>>> {
    Ok(Json(state.store.simulations(&city_id)?))
}

/// Generates and saves a retrofit proposal for one building.
///
/// `POST /api/propose` `{buildingId, cityId}` → 200 + stored `Proposal`
/// 400 without either id, 404 for an unknown building
pub async fn propose(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProposeRequest>, JsonRejection>,
) -> ApiResult<Stored<Proposal>> {
    let Json(req) = payload?;
    let (Some(building_id), Some(city_id)) = (present(req.building_id), present(req.city_id))
    else {
        return Err(ApiError::bad_request("Building ID and City ID required"));
    };
    let building = state
        .store
        .building(&building_id)?
        .ok_or_else(|| ApiError::not_found("Building not found"))?;

    let stored = state.store.save_proposal(generate_proposal(&building, &city_id))?;
    tracing::info!(
        building = %building_id,
        interventions = stored.record.interventions.len(),
        "proposal saved"
    );
    Ok(Json(stored))
}

/// `GET /api/cities/{id}/proposals` → 200 + `[Stored<Proposal>]`
pub async fn list_city_proposals(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<String>,
) -> ApiResult<Vec<Stored<Proposal>>> {
    Ok(Json(state.store.proposals(&city_id)?))
}

/// `GET /api/buildings/{id}/proposals` → 200 + `[Stored<Proposal>]`
pub async fn list_building_proposals(
    State(state): State<Arc<AppState>>,
    Path(building_id): Path<String>,
) -> ApiResult<Vec<Stored<Proposal>>> {
    Ok(Json(state.store.proposals_for_building(&building_id)?))
}

/// `POST /api/forecast` `{historicalValues, periods, alpha?}` → 200 + `{forecast}`
///
/// 400 when either required field is missing, `periods` is zero or above
/// [`MAX_FORECAST_PERIODS`], or `alpha` is out of range.
pub async fn forecast(
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> ApiResult<ForecastResponse> {
    let Json(req) = payload?;
    let (Some(history), Some(periods)) = (req.historical_values, req.periods.filter(|&p| p > 0))
    else {
        return Err(ApiError::bad_request("Historical values and periods required"));
    };
    let periods = bounded_periods(periods)?;
    let forecast = crate::forecast::forecast(&history, periods, req.alpha)?;
    Ok(Json(ForecastResponse { forecast }))
}

fn bounded_periods(periods: usize) -> Result<usize, ApiError> {
    if periods > MAX_FORECAST_PERIODS {
        return Err(ApiError::bad_request(format!(
            "periods must be <= {MAX_FORECAST_PERIODS}"
        )));
    }
    Ok(periods)
}

/// Forwards a question to the assistant.
///
/// `POST /api/chat` `{message, cityId?, contextMetrics?}` → 200 + `{response}`
/// 400 without `message`, 500 when the assistant backend fails
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<ChatResponse> {
    let Json(req) = payload?;
    let message = present(req.message).ok_or_else(|| ApiError::bad_request("Message required"))?;

    let metrics = match (req.context_metrics, present(req.city_id)) {
        (Some(metrics), _) => Some(metrics),
        (None, Some(city_id)) => state
            .store
            .latest_simulation(&city_id)?
            .map(|s| serde_json::to_value(s.record.metrics()))
            .transpose()
            .map_err(|e| ApiError::Internal(e.to_string()))?,
        (None, None) => None,
    };

    let response = state
        .assistant
        .reply(&message, metrics.as_ref().filter(|m| !m.is_null()))
        .await?;
    Ok(Json(ChatResponse { response }))
}

/// Unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::assistant::Assistant;
    use crate::dataset::Dataset;
    use crate::dataset::bengaluru::CITY_ID;
    use crate::store::MemoryStore;

    fn make_test_state() -> Arc<AppState> {
        let dataset = Dataset::from_preset("bengaluru").unwrap();
        AppState::new(Arc::new(MemoryStore::new(dataset)), Assistant::offline())
    }

    async fn send(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, Value) {
        let resp = router(Arc::clone(state)).oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn cities_returns_seeded_city() {
        let state = make_test_state();
        let (status, json) = send(&state, get("/api/cities")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["id"], CITY_ID);
        assert_eq!(json[0]["climateFactor"], 1.2);
    }

    #[tokio::test]
    async fn unknown_city_returns_404() {
        let state = make_test_state();
        let (status, json) = send(&state, get("/api/cities/nowhere")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "City not found");
    }

    #[tokio::test]
    async fn create_city_returns_201_with_default_climate() {
        let state = make_test_state();
        let body = json!({
            "name": "Lyon",
            "country": "France",
            "centerLat": 45.76,
            "centerLon": 4.83,
        });
        let (status, json) = send(&state, post("/api/cities", body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["climateFactor"], 1.0);
        let id = json["id"].as_str().unwrap().to_string();

        let (status, _) = send(&state, get(&format!("/api/cities/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn create_city_rejects_out_of_range_latitude() {
        let state = make_test_state();
        let body = json!({ "name": "X", "country": "Y", "centerLat": 91.0, "centerLon": 0.0 });
        let (status, json) = send(&state, post("/api/cities", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("centerLat"));
    }

    #[tokio::test]
    async fn malformed_json_is_400_with_error_body() {
        let state = make_test_state();
        let req = Request::builder()
            .method("POST")
            .uri("/api/cities")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, json) = send(&state, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn create_layer_and_list() {
        let state = make_test_state();
        let body = json!({
            "cityId": CITY_ID,
            "name": "Energy use",
            "type": "energy",
            "geoJSON": { "type": "FeatureCollection", "features": [] },
        });
        let (status, _) = send(&state, post("/api/layers", body)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, json) = send(&state, get(&format!("/api/cities/{CITY_ID}/layers"))).await;
        assert_eq!(json.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn buildings_and_sensors_listed_per_city() {
        let state = make_test_state();
        let (_, buildings) = send(&state, get(&format!("/api/cities/{CITY_ID}/buildings"))).await;
        assert_eq!(buildings.as_array().unwrap().len(), 5);
        assert_eq!(buildings[0]["type"], "commercial");
        assert_eq!(buildings[0]["properties"]["energyRating"], "B");

        let (_, sensors) = send(&state, get(&format!("/api/cities/{CITY_ID}/sensors"))).await;
        assert_eq!(sensors.as_array().unwrap().len(), 5);

        let (status, _) = send(&state, get("/api/buildings/ghost")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reading_appends_and_unknown_sensor_is_404() {
        let state = make_test_state();
        let body = json!({ "value": 610.0, "unit": "kWh" });
        let (status, json) =
            send(&state, post("/api/sensors/sensor-1/readings", body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["readings"].as_array().unwrap().len(), 6);

        let (status, _) = send(&state, post("/api/sensors/ghost/readings", body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let bad = json!({ "value": 1.0, "unit": "" });
        let (status, _) = send(&state, post("/api/sensors/sensor-1/readings", bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sensor_forecast_uses_reading_history() {
        let state = make_test_state();
        let uri = "/api/sensors/sensor-1/forecast?periods=3&alpha=1";
        let (status, json) = send(&state, get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["forecast"], json!([580.0, 580.0, 580.0]));

        let (status, _) = send(&state, get("/api/sensors/sensor-1/forecast?alpha=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&state, get("/api/sensors/ghost/forecast")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn simulate_saves_and_lists() {
        let state = make_test_state();
        let body = json!({ "cityId": CITY_ID });
        let (status, json) = send(&state, post("/api/simulate", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["id"].is_string());
        assert_eq!(json["cityId"], CITY_ID);
        assert_eq!(json["buildingResults"].as_array().unwrap().len(), 5);

        let (_, list) = send(&state, get(&format!("/api/cities/{CITY_ID}/simulations"))).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["id"], json["id"]);
    }

    #[tokio::test]
    async fn simulate_status_codes() {
        let state = make_test_state();
        let (status, json) = send(&state, post("/api/simulate", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "City ID required");

        let (status, _) = send(&state, post("/api/simulate", json!({ "cityId": "nowhere" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let body = json!({
            "name": "Empty",
            "country": "Nowhere",
            "centerLat": 0.0,
            "centerLon": 0.0,
        });
        let (_, city) = send(&state, post("/api/cities", body)).await;
        let body = json!({ "cityId": city["id"] });
        let (status, _) = send(&state, post("/api/simulate", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn propose_saves_and_filters() {
        let state = make_test_state();
        let body = json!({ "buildingId": "building-4", "cityId": CITY_ID });
        let (status, json) = send(&state, post("/api/propose", body)).await;
        assert_eq!(status, StatusCode::OK);
        // Green Tower already has solar and rainwater harvesting.
        let kinds: Vec<&str> = json["interventions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["type"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, ["green_roof", "passive_cooling"]);

        let (_, by_city) = send(&state, get(&format!("/api/cities/{CITY_ID}/proposals"))).await;
        assert_eq!(by_city.as_array().unwrap().len(), 1);
        let (_, by_building) = send(&state, get("/api/buildings/building-4/proposals")).await;
        assert_eq!(by_building.as_array().unwrap().len(), 1);
        let (_, other) = send(&state, get("/api/buildings/building-1/proposals")).await;
        assert!(other.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn propose_status_codes() {
        let state = make_test_state();
        let body = json!({ "buildingId": "building-1" });
        let (status, json) = send(&state, post("/api/propose", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Building ID and City ID required");

        let body = json!({ "buildingId": "ghost", "cityId": CITY_ID });
        let (status, _) = send(&state, post("/api/propose", body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn forecast_endpoint() {
        let state = make_test_state();
        let body = json!({ "historicalValues": [10.0, 20.0], "periods": 2, "alpha": 0.5 });
        let (status, json) = send(&state, post("/api/forecast", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["forecast"], json!([15.0, 15.0]));

        let body = json!({ "historicalValues": [1.0] });
        let (status, _) = send(&state, post("/api/forecast", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = json!({ "historicalValues": [1.0], "periods": 1, "alpha": 1.5 });
        let (status, _) = send(&state, post("/api/forecast", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_forecast_horizon_is_rejected() {
        let state = make_test_state();
        let body = json!({ "historicalValues": [1.0], "periods": u64::MAX });
        let (status, json) = send(&state, post("/api/forecast", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], format!("periods must be <= {MAX_FORECAST_PERIODS}"));

        let uri = format!("/api/sensors/sensor-1/forecast?periods={}", u64::MAX);
        let (status, json) = send(&state, get(&uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], format!("periods must be <= {MAX_FORECAST_PERIODS}"));

        let body = json!({ "historicalValues": [1.0], "periods": MAX_FORECAST_PERIODS });
        let (status, json) = send(&state, post("/api/forecast", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["forecast"].as_array().unwrap().len(), MAX_FORECAST_PERIODS);
    }

    #[tokio::test]
    async fn chat_requires_message() {
        let state = make_test_state();
        let (status, json) = send(&state, post("/api/chat", json!({ "message": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Message required");
    }

    #[tokio::test]
    async fn chat_uses_latest_simulation_for_city() {
        let state = make_test_state();
        let question = json!({ "message": "stress?", "cityId": CITY_ID });
        let (_, before) = send(&state, post("/api/chat", question.clone())).await;
        assert!(before["response"].as_str().unwrap().contains("Run a simulation"));

        let (_, sim) = send(&state, post("/api/simulate", json!({ "cityId": CITY_ID }))).await;
        let (status, after) = send(&state, post("/api/chat", question)).await;
        assert_eq!(status, StatusCode::OK);
        let stress = sim["averageStress"].as_f64().unwrap();
        let expected = format!("average stress level is {stress}");
        assert!(after["response"].as_str().unwrap().contains(&expected));
    }

    #[tokio::test]
    async fn chat_prefers_explicit_metrics() {
        let state = make_test_state();
        let body = json!({ "message": "energy", "contextMetrics": { "totalEnergy": 42.0 } });
        let (_, json) = send(&state, post("/api/chat", body)).await;
        assert!(json["response"].as_str().unwrap().contains("42 kWh/day"));
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let state = make_test_state();
        let (status, json) = send(&state, get("/api/nothing-here")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Not found");
    }
}
