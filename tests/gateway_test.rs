//! Gateway tests against a wiremock server: decoding, request shape,
//! error classification, and the response cache.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use railboard::api::{BoardSide, Client, NearbyRequest, StationBoardRequest};
use railboard::cache::{FileCache, DEFAULT_TTL};
use railboard::ApiError;

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .base_url(server.uri())
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}

fn location_json() -> serde_json::Value {
    serde_json::json!([
        {
            "extId": "8000105",
            "id": "A=1@O=Frankfurt(Main)Hbf@X=8663785@Y=50107149@L=8000105@",
            "name": "Frankfurt(Main)Hbf",
            "lat": 50.107149,
            "lon": 8.663785,
            "type": "ST",
            "products": ["ICE", "REGIONAL"]
        },
        {
            "extId": "8002041",
            "id": "A=1@O=Frankfurt Süd@L=8002041@",
            "name": "Frankfurt(Main)Süd",
            "type": "ST",
            "products": ["REGIONAL", "SBAHN"]
        }
    ])
}

#[tokio::test]
async fn search_locations_decodes_and_sends_browser_identity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reiseloesung/orte"))
        .and(query_param("suchbegriff", "Frankfurt"))
        .and(query_param("typ", "ALL"))
        .and(query_param("limit", "10"))
        .and(header_exists("x-correlation-id"))
        .and(header_exists("User-Agent"))
        .and(header_exists("sec-ch-ua"))
        .respond_with(ResponseTemplate::new(200).set_body_json(location_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let locations = client.search_locations("Frankfurt").await.unwrap();

    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].eva, 8000105);
    assert_eq!(locations[0].name, "Frankfurt(Main)Hbf");
    // The second entry has no direct coordinates and none in the id.
    assert_eq!(locations[1].eva, 8002041);
}

#[tokio::test]
async fn board_request_carries_station_and_modes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reiseloesung/abfahrten"))
        .and(query_param("ortExtId", "8000105"))
        .and(query_param("ortId", "A=1@L=8000105@"))
        .and(query_param("mitVias", "true"))
        .and(query_param("maxVias", "5"))
        .and(query_param("verkehrsmittel[]", "ICE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entries": [{
                "journeyId": "j1",
                "terminus": "Berlin Hbf",
                "gleis": "7",
                "zeit": "2024-07-01T18:55:00",
                "ezZeit": "2024-07-01T19:01:00",
                "verkehrmittel": {"kurzText": "ICE", "mittelText": "ICE 1537"}
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let departures = client
        .station_board(
            StationBoardRequest {
                eva: 8000105,
                station_id: "A=1@L=8000105@".to_string(),
                date_time: None,
                num_vias: 0,
                modes: vec!["ICE".to_string()],
            },
            BoardSide::Departures,
        )
        .await
        .unwrap();

    assert_eq!(departures.len(), 1);
    assert_eq!(departures[0].journey_id, "j1");
    assert_eq!(departures[0].destination, "Berlin Hbf");
    assert_eq!(departures[0].delay, 6);
}

#[tokio::test]
async fn arrivals_use_their_own_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reiseloesung/ankuenfte"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"entries": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let arrivals = client
        .arrivals(StationBoardRequest {
            eva: 8000105,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(arrivals.is_empty());
}

#[tokio::test]
async fn journey_404_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reiseloesung/fahrt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.journey("unknown-id", false).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::NotFound {
            endpoint: "/reiseloesung/fahrt".to_string()
        }
    );
}

#[tokio::test]
async fn status_codes_classify() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reiseloesung/orte"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reiseloesung/orte/nearby"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = client.search_locations("x").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Server {
            status: 500,
            endpoint: "/reiseloesung/orte".to_string()
        }
    );

    let err = client
        .search_nearby(NearbyRequest {
            lat: 50.1,
            lon: 8.6,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reiseloesung/orte"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.search_locations("Frankfurt").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn cache_hit_skips_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reiseloesung/orte"))
        .respond_with(ResponseTemplate::new(200).set_body_json(location_json()))
        .expect(1) // the second call must be served from the cache
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(FileCache::new(dir.path(), DEFAULT_TTL).unwrap());
    let client = Client::builder()
        .base_url(server.uri())
        .cache(cache)
        .build()
        .unwrap();

    let first = client.search_locations("Frankfurt").await.unwrap();
    let second = client.search_locations("Frankfurt").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn different_queries_are_cached_separately() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reiseloesung/orte"))
        .and(query_param("suchbegriff", "Frankfurt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(location_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reiseloesung/orte"))
        .and(query_param("suchbegriff", "Köln"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(FileCache::new(dir.path(), DEFAULT_TTL).unwrap());
    let client = Client::builder()
        .base_url(server.uri())
        .cache(cache)
        .build()
        .unwrap();

    assert_eq!(client.search_locations("Frankfurt").await.unwrap().len(), 2);
    assert_eq!(client.search_locations("Köln").await.unwrap().len(), 0);
}

#[tokio::test]
async fn formation_query_is_utc() {
    use chrono::TimeZone;

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reisebegleitung/wagenreihung/vehicle-sequence"))
        .and(query_param("administrationId", "80"))
        .and(query_param("category", "ICE"))
        .and(query_param("number", "623"))
        .and(query_param("evaNumber", "8000105"))
        .and(query_param("date", "2024-07-01"))
        .and(query_param("time", "2024-07-01T17:00:00.000Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "departurePlatform": "7",
            "platform": {"start": 0.0, "end": 400.0, "sectors": []},
            "groups": []
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let formation = client
        .formation(railboard::api::FormationRequest {
            eva: 8000105,
            train_type: "ICE".to_string(),
            train_number: "623".to_string(),
            departure: Some(chrono::Utc.with_ymd_and_hms(2024, 7, 1, 17, 0, 0).unwrap()),
        })
        .await
        .unwrap();

    assert_eq!(formation.platform, "7");
}
