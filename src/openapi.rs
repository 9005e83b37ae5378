use axum::Json;
use utoipa::OpenApi;

use crate::{
    error::ErrorBody,
    routes::{CreateWeatherRequest, MessageResponse, UpdateWeatherRequest},
    store::WeatherRecord,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Weather Records API"),
    paths(
        crate::routes::get_weather,
        crate::routes::add_weather,
        crate::routes::update_weather,
        crate::routes::delete_weather,
    ),
    components(schemas(
        WeatherRecord,
        CreateWeatherRequest,
        UpdateWeatherRequest,
        MessageResponse,
        ErrorBody,
    )),
    tags((name = "weather", description = "Weather records keyed by city"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_weather_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/weather"));
        assert!(doc.paths.paths.contains_key("/weather/{city}"));

        let schemas = doc.components.expect("components").schemas;
        assert!(schemas.contains_key("WeatherRecord"));
        assert!(schemas.contains_key("ErrorBody"));
    }
}
