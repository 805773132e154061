//! Request helper behaviour

use std::time::Duration;

use reserva_client::{
    error::AppError,
    http::{ApiClient, RequestOptions},
    session::Session,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn client(server: &MockServer, session: Session) -> ApiClient {
    ApiClient::new(reqwest::Client::new(), server.uri(), session)
}

#[tokio::test]
async fn test_bearer_token_from_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/domains/buildings"))
        .and(header("Authorization", "Bearer abc.def.ghi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "code": 1, "name": "Edificio 1" }])))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::in_memory();
    session.set_token("abc.def.ghi").unwrap();

    let value = client(&server, session)
        .send(RequestOptions::get("getBuildingsDomain", "/api/domains/buildings"))
        .await
        .unwrap();
    assert_eq!(value, Some(json!([{ "code": 1, "name": "Edificio 1" }])));
}

#[tokio::test]
async fn test_no_authorization_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client(&server, Session::in_memory())
        .send(RequestOptions::get("getSpaceTypesDomain", "/api/domains/space-types"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_error_status_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/operations/space/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = client(&server, Session::in_memory())
        .send(RequestOptions::get("getReservedSpaceDetails", "/api/operations/space/99"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    let message = err.to_string();
    assert!(message.contains("getReservedSpaceDetails"));
    assert!(message.contains("404"));
    assert!(message.contains("not found"));
}

#[tokio::test]
async fn test_no_content_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/operations/hardware/12"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let value = client(&server, Session::in_memory())
        .send(RequestOptions::delete("deleteHardwareReservation", "/api/operations/hardware/12"))
        .await
        .unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"code\":", "application/json"))
        .mount(&server)
        .await;

    let err = client(&server, Session::in_memory())
        .send(RequestOptions::get("getReservedHardwareDetails", "/api/operations/hardware/1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Decode { ref request, .. } if request == "getReservedHardwareDetails"));
}

#[tokio::test]
async fn test_plain_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_string("Reserva creada"))
        .mount(&server)
        .await;

    let value = client(&server, Session::in_memory())
        .send(RequestOptions::post("createSpaceReservation", "/api/operations/space"))
        .await
        .unwrap();
    assert_eq!(value, Some(Value::String("Reserva creada".to_string())));
}

#[tokio::test]
async fn test_content_type_only_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let client = client(&server, Session::in_memory());

    client
        .send(
            RequestOptions::post("returnSpace", "/api/operations/space/3/return")
                .body(&json!({ "conditionRate": 5, "serviceRate": 4 }))
                .unwrap(),
        )
        .await
        .unwrap();
    client
        .send(
            RequestOptions::post("handOverSpace", "/api/operations/space/3/handOver")
                .body(&json!({}))
                .unwrap(),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].headers.get("content-type").unwrap(),
        "application/json"
    );
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({ "conditionRate": 5, "serviceRate": 4 }));
    assert!(requests[1].headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_query_params_skip_missing_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/operations/space/availability"))
        .and(query_param("getAll", "true"))
        .and(query_param("capacity", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, Session::in_memory())
        .send(
            RequestOptions::get("getAvailableSpaces", "/api/operations/space/availability")
                .params(&json!({ "getAll": true, "capacity": 20, "nameLike": null }))
                .unwrap(),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default();
    assert!(!query.contains("nameLike"));
}

#[tokio::test]
async fn test_cancelled_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let client = client(&server, Session::in_memory()).with_cancellation(cancel.clone());

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let err = client
        .send(RequestOptions::get("getAvailableHardware", "/api/operations/hardware/availability"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Cancelled(ref name) if name == "getAvailableHardware"));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_transport_error() {
    let client = ApiClient::new(reqwest::Client::new(), "http://127.0.0.1:1", Session::in_memory());
    let err = client
        .send(RequestOptions::get("checkHealth", "/api/operations/health"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Transport { .. }));
}
