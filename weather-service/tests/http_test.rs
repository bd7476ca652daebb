use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use common::errors::INVALID_LOCATION_MESSAGE;
use common::http_client::HttpClient;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use weather_service::api_client::OpenWeatherClient;
use weather_service::handlers::AppState;
use weather_service::service::WeatherService;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

async fn app_for(server: &MockServer) -> axum::Router {
    let http_client = HttpClient::new(Duration::from_secs(5)).expect("Failed to build HTTP client");
    let client = OpenWeatherClient::new(http_client, server.uri(), "key");
    let service = Arc::new(WeatherService::new(client, Duration::from_secs(1800)));
    weather_service::router(AppState { service })
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("Request failed");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).expect("Body is not JSON");
    (status, body)
}

async fn mount_tokyo(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Tokyo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "main": { "temp": 16.333, "temp_min": 14.0, "temp_max": 18.5 },
            "weather": [{ "description": "few clouds" }]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health_reports_cache_size() {
    let mock_server = MockServer::start().await;
    let app = app_for(&mock_server).await;

    let (status, body) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cached_entries"], 0);
}

#[tokio::test]
async fn test_display_endpoint_returns_text_for_every_outcome() {
    let mock_server = MockServer::start().await;
    mount_tokyo(&mock_server).await;
    let app = app_for(&mock_server).await;

    let (status, body) = get_json(&app, "/api/weather?location=Tokyo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Temperature: 16.33°C \n(Min: 14.0°C, Max: 18.5°C) \nfew clouds"
    );

    let (_, body) = get_json(&app, "/api/weather?location=Tokyo").await;
    assert!(body["message"].as_str().unwrap().starts_with("(Cache)\n"));

    let (status, body) = get_json(&app, "/api/weather?location=Tokyo%2C%20JP").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], INVALID_LOCATION_MESSAGE);

    let (status, body) = get_json(&app, "/api/weather").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], INVALID_LOCATION_MESSAGE);
}

#[tokio::test]
async fn test_structured_endpoint() {
    let mock_server = MockServer::start().await;
    mount_tokyo(&mock_server).await;
    let app = app_for(&mock_server).await;

    let (status, body) = get_json(&app, "/api/weather/Tokyo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "Tokyo");
    assert_eq!(body["cached"], false);
    let fetched_at = body["fetched_at"].as_str().unwrap().to_string();

    let (_, body) = get_json(&app, "/api/weather/Tokyo").await;
    assert_eq!(body["cached"], true);
    assert_eq!(body["fetched_at"], fetched_at.as_str());
}

#[tokio::test]
async fn test_structured_endpoint_maps_errors_to_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    let app = app_for(&mock_server).await;

    let (status, body) = get_json(&app, "/api/weather/Phoenix%2C%20AZ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], INVALID_LOCATION_MESSAGE);

    let (status, _) = get_json(&app, "/api/weather/Atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
