use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::Uri,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ErrorBody},
    openapi,
    store::{WeatherRecord, WeatherStore, WeatherUpdate},
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<WeatherStore>,
}

// Request/Response types
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWeatherRequest {
    pub city: Option<String>,
    pub temperature: Option<i64>,
    pub weather: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateWeatherRequest {
    pub temperature: Option<i64>,
    pub weather: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: String) -> Json<Self> {
        Json(Self { message })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub records: usize,
}

// Empty strings and zero count as absent, matching the legacy clients.
fn present_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn present_temperature(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}

// Route handlers
pub async fn home() -> &'static str {
    "Welcome to Home-Page!"
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        records: state.store.len(),
    })
}

#[utoipa::path(
    get,
    path = "/weather/{city}",
    tag = "weather",
    params(("city" = String, Path, description = "City name, matched case-sensitively")),
    responses(
        (status = 200, description = "Weather record for the city", body = WeatherRecord),
        (status = 404, description = "No data for the city", body = ErrorBody)
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<WeatherRecord>, ApiError> {
    state
        .store
        .get(&city)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Weather Data of city: {} not found", city)))
}

#[utoipa::path(
    post,
    path = "/weather",
    tag = "weather",
    request_body = CreateWeatherRequest,
    responses(
        (status = 200, description = "Record stored, replacing any existing one", body = MessageResponse),
        (status = 400, description = "Missing required fields or malformed body", body = ErrorBody)
    )
)]
pub async fn add_weather(
    State(state): State<AppState>,
    payload: Result<Json<CreateWeatherRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;

    let (city, temperature, condition) = match (
        present_text(request.city),
        present_temperature(request.temperature),
        present_text(request.weather),
    ) {
        (Some(city), Some(temperature), Some(condition)) => (city, temperature, condition),
        _ => return Err(ApiError::Validation("Missing required fields".to_string())),
    };

    let message = format!("Weather Data added for {}", city);
    state.store.put(city, WeatherRecord::new(temperature, condition));
    Ok(MessageResponse::new(message))
}

#[utoipa::path(
    put,
    path = "/weather/{city}",
    tag = "weather",
    params(("city" = String, Path, description = "City name, matched case-sensitively")),
    request_body = UpdateWeatherRequest,
    responses(
        (status = 200, description = "Supplied fields updated", body = MessageResponse),
        (status = 400, description = "Malformed body", body = ErrorBody),
        (status = 404, description = "No data for the city", body = ErrorBody)
    )
)]
pub async fn update_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
    payload: Result<Json<UpdateWeatherRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let not_found = || ApiError::NotFound(format!("Weather Data not found for city: {}", city));

    if !state.store.contains(&city) {
        return Err(not_found());
    }
    let Json(request) = payload?;

    let update = WeatherUpdate {
        temperature: present_temperature(request.temperature),
        condition: present_text(request.weather),
    };
    state.store.merge(&city, update).map_err(|_| not_found())?;

    Ok(MessageResponse::new(format!("Weather Data updated for {}", city)))
}

#[utoipa::path(
    delete,
    path = "/weather/{city}",
    tag = "weather",
    params(("city" = String, Path, description = "City name, matched case-sensitively")),
    responses(
        (status = 200, description = "Record removed", body = MessageResponse),
        (status = 404, description = "No data for the city", body = ErrorBody)
    )
)]
pub async fn delete_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .remove(&city)
        .map_err(|_| ApiError::NotFound(format!("Weather Data of city: {} not found.", city)))?;

    Ok(MessageResponse::new(format!(
        "Weather Data of {} Deleted Successfully",
        city
    )))
}

pub async fn fallback(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Resource {} does not exist.", uri.path()))
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/weather", post(add_weather))
        .route(
            "/weather/:city",
            get(get_weather).put(update_weather).delete(delete_weather),
        )
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .fallback(fallback)
        .with_state(state)
}
