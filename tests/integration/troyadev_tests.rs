//! TroyaDev login caching and client-side availability

use chrono::{TimeZone, Utc};
use reserva_client::{filter::AvailabilityQuery, session::Session};
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::state_for;

async fn mount_catalog(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/resource/all"))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "recu_ID": 1, "tireid": 3, "recu_NOMBRE": "Proyector Epson", "recu_FECHA_REGISTRO": "2025-01-10T10:00:00" },
                { "recu_ID": 2, "tireid": 3, "recu_NOMBRE": "Proyector BenQ", "recu_FECHA_REGISTRO": "2025-01-10T10:00:00" },
                { "recu_ID": 3, "tireid": 4, "recu_NOMBRE": "Cámara Sony", "recu_FECHA_REGISTRO": "2025-01-12" }
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/booking/all"))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "usua_NOMBRES": "Ana", "usua_APELLIDOS": "Ríos", "usua_CORREO": "ana@example.com",
                    "rese_ID": 10, "recu_NOMBRE": "Proyector Epson", "rese_ESTADO": "CREADA",
                    "usua_CLIENTE": 4, "rese_CALIFICACION": null,
                    "rese_FECHA_REGISTRO": "2025-03-10T15:00:00Z"
                },
                {
                    "usua_NOMBRES": "Luis", "usua_APELLIDOS": "Mora", "usua_CORREO": "luis@example.com",
                    "rese_ID": 11, "recu_NOMBRE": "Proyector BenQ", "rese_ESTADO": "DEVUELTA",
                    "usua_CLIENTE": 5, "rese_CALIFICACION": 5,
                    "rese_FECHA_REGISTRO": "2025-03-10T15:30:00Z"
                }
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "integracion@example.com", "password": "secreto" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "token": token } })))
        .expect(times)
        .mount(server)
        .await;
}

fn query(name: &str, type_id: i64) -> AvailabilityQuery {
    AvailabilityQuery {
        name: name.to_string(),
        type_id,
        start: Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_available_logs_in_once() {
    let server = MockServer::start().await;
    mount_login(&server, "troya-token", 1).await;
    mount_catalog(&server, "troya-token").await;

    let state = state_for(&server, Session::in_memory());
    let available = state
        .services
        .troya_dev
        .available(&query("proyector", 0))
        .await
        .unwrap();

    let names: Vec<&str> = available.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Proyector BenQ"]);
    assert_eq!(
        state.session.snapshot().troya_dev_token.as_deref(),
        Some("troya-token")
    );

    // Second call reuses the cached token
    let available = state
        .services
        .troya_dev
        .available(&query("", 4))
        .await
        .unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].name, "Cámara Sony");
}

#[tokio::test]
async fn test_cached_token_skips_login() {
    let server = MockServer::start().await;
    mount_login(&server, "fresh-token", 0).await;
    mount_catalog(&server, "cached-token").await;

    let session = Session::in_memory();
    session
        .set_troya_dev_token("cached-token", Utc::now().timestamp_millis())
        .unwrap();

    let state = state_for(&server, session);
    let resources = state.services.troya_dev.available(&query("", 0)).await.unwrap();
    assert_eq!(resources.len(), 2);
}

#[tokio::test]
async fn test_expired_token_triggers_login() {
    let server = MockServer::start().await;
    mount_login(&server, "fresh-token", 1).await;
    mount_catalog(&server, "fresh-token").await;

    let session = Session::in_memory();
    let two_hours_ago = Utc::now().timestamp_millis() - 2 * 60 * 60 * 1000;
    session
        .set_troya_dev_token("stale-token", two_hours_ago)
        .unwrap();

    let state = state_for(&server, session);
    state.services.troya_dev.available(&query("", 0)).await.unwrap();
    assert_eq!(
        state.session.snapshot().troya_dev_token.as_deref(),
        Some("fresh-token")
    );
}

#[tokio::test]
async fn test_login_without_token_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(&server)
        .await;

    let state = state_for(&server, Session::in_memory());
    let err = state.services.troya_dev.token().await.unwrap_err();
    assert!(err.to_string().contains("does not contain a token"));
}
