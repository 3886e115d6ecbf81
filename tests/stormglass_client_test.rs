use httpmock::prelude::*;
use surf_forecast::{
    ClientError, DataSource, ForecastPoint, ReqwestTransport, StormGlass, StormGlassConfig,
    ValidityPolicy,
};
use tokio_test::{assert_err, assert_ok};

const PARAMS: &str =
    "swellDirection,swellHeight,swellPeriod,waveDirection,waveHeight,windDirection,windSpeed";

fn hour(time: &str, offset: f64) -> serde_json::Value {
    serde_json::json!({
        "time": time,
        "swellDirection": {"icon": 64.26 + offset, "noaa": 64.26 + offset, "sg": 64.26 + offset},
        "swellHeight": {"icon": 0.15 + offset, "noaa": 0.15 + offset, "sg": 0.15 + offset},
        "swellPeriod": {"icon": 3.89 + offset, "noaa": 3.89 + offset, "sg": 3.89 + offset},
        "waveDirection": {"icon": 231.38 + offset, "noaa": 231.38 + offset, "sg": 231.38 + offset},
        "waveHeight": {"icon": 0.47 + offset, "meteo": 0.46 + offset, "noaa": 0.47 + offset, "sg": 0.47 + offset},
        "windDirection": {"icon": 299.45 + offset, "noaa": 299.45 + offset, "sg": 299.45 + offset},
        "windSpeed": {"icon": 100.0 + offset, "noaa": 100.0 + offset, "sg": 100.0 + offset}
    })
}

fn stormglass_fixture() -> serde_json::Value {
    serde_json::json!({
        "hours": [
            hour("2020-04-26T00:00:00+00:00", 0.0),
            hour("2020-04-26T01:00:00+00:00", 1.0),
            hour("2020-04-26T02:00:00+00:00", 2.0)
        ],
        "meta": {
            "cost": 1,
            "dailyQuota": 10,
            "lat": -33.792726,
            "lng": 151.289824,
            "params": PARAMS.split(',').collect::<Vec<_>>(),
            "requestCount": 1,
            "source": ["noaa"]
        }
    })
}

fn client(server: &MockServer) -> StormGlass<ReqwestTransport> {
    StormGlass::new(
        StormGlassConfig::new(server.url("/v2"), "fake-token"),
        ReqwestTransport::new(),
    )
}

#[tokio::test]
async fn test_fetch_points_returns_normalized_forecast() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/weather/point")
            .query_param("lat", "-33.792726")
            .query_param("lng", "151.289824")
            .query_param("params", PARAMS)
            .query_param("source", "noaa")
            .header("authorization", "fake-token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(stormglass_fixture());
    });

    let points = assert_ok!(client(&server).fetch_points(-33.792726, 151.289824).await);

    api_mock.assert();
    assert_eq!(points.len(), 3);
    assert_eq!(
        points[0],
        ForecastPoint {
            time: "2020-04-26T00:00:00+00:00".to_string(),
            wave_height: 0.47,
            wave_direction: 231.38,
            swell_direction: 64.26,
            swell_height: 0.15,
            swell_period: 3.89,
            wind_direction: 299.45,
            wind_speed: 100.0,
        }
    );
    assert_eq!(points[2].time, "2020-04-26T02:00:00+00:00");
}

#[tokio::test]
async fn test_incomplete_hour_is_dropped_end_to_end() {
    let server = MockServer::start();
    let mut incomplete = hour("2020-04-26T01:00:00+00:00", 1.0);
    incomplete["windSpeed"]
        .as_object_mut()
        .unwrap()
        .remove("noaa");

    server.mock(|when, then| {
        when.method(GET).path("/v2/weather/point");
        then.status(200).json_body(serde_json::json!({
            "hours": [hour("2020-04-26T00:00:00+00:00", 0.0), incomplete]
        }));
    });

    let points = assert_ok!(client(&server).fetch_points(-33.792726, 151.289824).await);

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].time, "2020-04-26T00:00:00+00:00");
    assert_eq!(points[0].wind_speed, 100.0);
}

#[tokio::test]
async fn test_rate_limit_is_response_error() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v2/weather/point");
        then.status(429)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"errors": "Rate limit"}));
    });

    let err = assert_err!(client(&server).fetch_points(-33.792726, 151.289824).await);

    api_mock.assert();
    assert!(matches!(err, ClientError::Response(_)));
    assert_eq!(
        err.to_string(),
        r#"Unexpected error returned by the StormGlass service: Error: {"errors":"Rate limit"} Code: 429"#
    );
}

#[tokio::test]
async fn test_unreachable_host_is_client_request_error() {
    let client = StormGlass::new(
        StormGlassConfig::new("http://127.0.0.1:1/v2", "fake-token"),
        ReqwestTransport::new(),
    );

    let err = assert_err!(client.fetch_points(-33.792726, 151.289824).await);

    assert!(matches!(err, ClientError::ClientRequest(_)));
    assert!(err
        .to_string()
        .starts_with("Unexpected error when trying to communicate to StormGlass: "));
}

#[tokio::test]
async fn test_zero_values_follow_validity_policy() {
    let server = MockServer::start();
    let mut calm = hour("2020-04-26T00:00:00+00:00", 0.0);
    calm["windSpeed"]["noaa"] = serde_json::json!(0);

    server.mock(|when, then| {
        when.method(GET).path("/v2/weather/point");
        then.status(200).json_body(serde_json::json!({"hours": [calm]}));
    });

    let legacy = assert_ok!(client(&server).fetch_points(1.0, 1.0).await);
    assert!(legacy.is_empty());

    let keep_zeros = StormGlass::new(
        StormGlassConfig::new(server.url("/v2"), "fake-token")
            .with_validity(ValidityPolicy::RequirePresence),
        ReqwestTransport::new(),
    );
    let points = assert_ok!(keep_zeros.fetch_points(1.0, 1.0).await);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].wind_speed, 0.0);
}

#[tokio::test]
async fn test_alternate_source_is_requested_and_used() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/weather/point")
            .query_param("source", "sg");
        then.status(200).json_body(stormglass_fixture());
    });

    let client = StormGlass::new(
        StormGlassConfig::new(server.url("/v2"), "fake-token").with_source(DataSource::Sg),
        ReqwestTransport::new(),
    );
    let points = assert_ok!(client.fetch_points(0.0, 0.0).await);

    api_mock.assert();
    assert_eq!(points.len(), 3);
}
