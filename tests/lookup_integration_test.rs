use arrondissement::{engine_from_config, Coordinate, LookupStatus, TomlConfig};
use httpmock::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn fixed_config(server: &MockServer, backend: &str, latitude: f64, longitude: f64) -> TomlConfig {
    TomlConfig::from_toml_str(&format!(
        r#"
[location]
source = "fixed"
latitude = {latitude}
longitude = {longitude}

[geocoder]
backend = "{backend}"
endpoint = "{endpoint}"
timeout_seconds = 5
"#,
        endpoint = server.base_url(),
    ))
    .unwrap()
}

fn track_config(server: &MockServer, track: &NamedTempFile) -> TomlConfig {
    TomlConfig::from_toml_str(&format!(
        r#"
[location]
source = "track"
track_file = "{track}"
update_interval_ms = 10
min_update_interval_ms = 5
acquisition_timeout_seconds = 2

[geocoder]
backend = "nominatim"
endpoint = "{endpoint}"
"#,
        track = track.path().display(),
        endpoint = server.base_url(),
    ))
    .unwrap()
}

fn nominatim_postcode<'a>(
    server: &'a MockServer,
    latitude: &'a str,
    postcode: &str,
) -> httpmock::Mock<'a> {
    let postcode = postcode.to_string();
    server.mock(move |when, then| {
        when.method(GET)
            .path("/reverse")
            .query_param("lat", latitude);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "display_name": format!("Paris, {}, France", postcode),
                "address": { "city": "Paris", "postcode": postcode, "country_code": "fr" }
            }));
    })
}

#[tokio::test]
async fn test_end_to_end_nominatim_sixteenth() {
    let server = MockServer::start();
    let mock = nominatim_postcode(&server, "48.8638", "75116");

    let config = fixed_config(&server, "nominatim", 48.8638, 2.2769);
    let engine = engine_from_config(&config).unwrap();

    let state = engine.refresh().await;

    mock.assert();
    assert!(!state.is_loading);
    assert_eq!(state.coordinate, Some(Coordinate::new(48.8638, 2.2769)));
    assert_eq!(state.postal_code.as_deref(), Some("75116"));
    assert_eq!(state.district, Some(16));
    assert_eq!(state.to_string(), "Arrondissement 16");
}

#[tokio::test]
async fn test_end_to_end_adresse_outside_paris() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/reverse/");
        then.status(200).json_body(serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "properties": { "postcode": "92100", "city": "Boulogne-Billancourt", "label": "Boulogne-Billancourt" }
            }]
        }));
    });

    let config = fixed_config(&server, "adresse", 48.8352, 2.2410);
    let engine = engine_from_config(&config).unwrap();

    let state = engine.refresh().await;

    mock.assert();
    assert_eq!(state.postal_code.as_deref(), Some("92100"));
    assert_eq!(state.district, None);
    assert!(state.to_string().starts_with("Not in Paris?"));
}

#[tokio::test]
async fn test_geocoder_outage_degrades_to_no_address() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/reverse");
        then.status(500);
    });

    let config = fixed_config(&server, "nominatim", 48.8606, 2.3376);
    let engine = engine_from_config(&config).unwrap();

    let state = engine.refresh().await;

    assert!(!state.is_loading);
    assert_eq!(state.coordinate, Some(Coordinate::new(48.8606, 2.3376)));
    assert_eq!(state.postal_code, None);
    assert_eq!(state.district, None);
    assert_eq!(state.status, None);
}

#[tokio::test]
async fn test_stale_track_fix_is_replaced_by_live_update() {
    let server = MockServer::start();
    let live = nominatim_postcode(&server, "48.8738", "75008");
    let stale = nominatim_postcode(&server, "48.8", "75013");

    let mut track = NamedTempFile::new().unwrap();
    track
        .write_all(
            br#"{
                "last_known": { "latitude": 48.8, "longitude": 2.36, "recorded_at": "2020-01-01T00:00:00Z" },
                "updates": [
                    { "latitude": 48.8738, "longitude": 2.2950 },
                    { "latitude": 48.8530, "longitude": 2.3499 }
                ]
            }"#,
        )
        .unwrap();

    let config = track_config(&server, &track);
    let engine = engine_from_config(&config).unwrap();

    let state = engine.refresh().await;

    live.assert();
    stale.assert_hits(0);
    assert_eq!(state.coordinate, Some(Coordinate::new(48.8738, 2.2950)));
    assert_eq!(state.district, Some(8));
}

#[tokio::test]
async fn test_permission_denied_track_reports_status() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/reverse");
        then.status(200).json_body(serde_json::json!({}));
    });

    let mut track = NamedTempFile::new().unwrap();
    track.write_all(br#"{ "permission_denied": true }"#).unwrap();

    let config = track_config(&server, &track);
    let engine = engine_from_config(&config).unwrap();

    let state = engine.refresh().await;

    mock.assert_hits(0);
    assert_eq!(state.status, Some(LookupStatus::PermissionDenied));
    assert_eq!(state.coordinate, None);
    assert_eq!(state.to_string(), "Not in Paris?\nStatus: Permission Denied");
}

#[tokio::test]
async fn test_strict_policy_rejects_unknown_district() {
    let server = MockServer::start();
    nominatim_postcode(&server, "48.85", "75099");

    let mut config = fixed_config(&server, "nominatim", 48.85, 2.35);
    config.district.range_policy = arrondissement::RangePolicy::Strict;
    let strict = engine_from_config(&config).unwrap();
    assert_eq!(strict.refresh().await.district, None);

    config.district.range_policy = arrondissement::RangePolicy::Lenient;
    let lenient = engine_from_config(&config).unwrap();
    assert_eq!(lenient.refresh().await.district, Some(99));
}

#[test]
fn test_missing_track_file_fails_engine_construction() {
    let server = MockServer::start();
    let config = TomlConfig::from_toml_str(&format!(
        "[location]\nsource = \"track\"\ntrack_file = \"/nonexistent/track.json\"\n\n[geocoder]\nendpoint = \"{}\"\n",
        server.base_url()
    ))
    .unwrap();

    let err = engine_from_config(&config).err().unwrap();
    assert!(matches!(err, arrondissement::LocatorError::IoError(_)));
}
