//! Integration tests for WeatherProvider using wiremock.

use moodmeal_core::WeatherConfig;
use moodmeal_weather::{
    FixedLocation, LocatedWeather, Location, WeatherError, WeatherProvider, WeatherSource,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer, api_key: Option<&str>) -> WeatherProvider {
    let config = WeatherConfig {
        api_key: api_key.map(str::to_string),
        base_url: server.uri(),
        ..Default::default()
    };
    WeatherProvider::new(&config).unwrap()
}

fn seattle() -> Location {
    Location {
        latitude: 47.6,
        longitude: -122.3,
    }
}

#[tokio::test]
async fn test_fetch_current_weather() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": 200,
            "main": { "temp": 11.4, "humidity": 80 },
            "weather": [ { "id": 500, "main": "Rain", "description": "light rain" } ]
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server, Some("test-key"));
    let current = provider.fetch(&seattle()).await.unwrap();

    assert_eq!(current.condition, "Rain");
    assert!((current.temperature - 11.4).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_api_error_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server, Some("test-key"));
    let err = provider.fetch(&seattle()).await.unwrap_err();
    assert!(matches!(err, WeatherError::Api(ref m) if m == "city not found"));

    let snapshot = provider.snapshot(&seattle()).await;
    assert!(snapshot.condition.is_none());
    assert!(snapshot.error.unwrap().contains("city not found"));
}

#[tokio::test]
async fn test_invalid_api_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server, Some("bad-key"));
    let err = provider.fetch(&seattle()).await.unwrap_err();
    assert!(matches!(err, WeatherError::InvalidApiKey));
}

#[tokio::test]
async fn test_garbage_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server, Some("test-key"));
    let err = provider.fetch(&seattle()).await.unwrap_err();
    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn test_located_weather_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "47.6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": 200,
            "main": { "temp": 22.0 },
            "weather": [ { "main": "Clear" } ]
        })))
        .mount(&mock_server)
        .await;

    let source = LocatedWeather::new(
        provider_for(&mock_server, Some("test-key")),
        FixedLocation::new(47.6, -122.3),
    );
    let snapshot = source.current().await;

    assert_eq!(snapshot.condition(), Some("Clear"));
    assert_eq!(snapshot.temperature, Some(22.0));
    assert!(snapshot.error.is_none());
}
