//! Service calls against mocked campus backends

use reserva_client::{
    error::AppError,
    filter::{FilterDraft, FilterField},
    models::{
        domain::NewSpaceType,
        reservation::ReturnRates,
        user::{RegisterUser, ROLE_ADMIN},
    },
    services::resources::INFO_SPACE_STATES,
    session::Session,
};
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use crate::{state_for, token};

#[tokio::test]
async fn test_login_stores_token() {
    let server = MockServer::start().await;
    let jwt = token("usuario2@example.com", &["ROLE_USER"], 3600);
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "usuario2@example.com", "password": "clave" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": jwt })))
        .expect(1)
        .mount(&server)
        .await;

    let state = state_for(&server, Session::in_memory());
    state
        .services
        .auth
        .login("usuario2@example.com", "clave")
        .await
        .unwrap();

    assert!(state.session.is_logged_in());
    assert_eq!(state.session.sub().as_deref(), Some("usuario2@example.com"));
    assert!(!state.session.is_admin());
    let claims = state.services.auth.whoami().unwrap();
    assert_eq!(claims.roles, Some(vec!["ROLE_USER".to_string()]));

    state.services.auth.logout().unwrap();
    assert!(!state.session.is_logged_in());
    assert!(state.services.auth.whoami().is_none());
}

#[tokio::test]
async fn test_login_without_token_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;

    let state = state_for(&server, Session::in_memory());
    let err = state
        .services
        .auth
        .login("usuario2@example.com", "clave")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));
    assert!(state.session.token().is_none());
}

#[tokio::test]
async fn test_register_without_token_keeps_session_closed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "created" })))
        .expect(1)
        .mount(&server)
        .await;

    let state = state_for(&server, Session::in_memory());
    let user = RegisterUser {
        code: 20201020,
        name: "Usuario Nuevo".to_string(),
        email: "nuevo@example.com".to_string(),
        password: "clave123".to_string(),
        phone: None,
        address: None,
    };
    assert_eq!(state.services.auth.register(&user).await.unwrap(), None);
    assert!(state.session.token().is_none());

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("phone").is_none());
    assert_eq!(body["code"], 20201020);
}

#[tokio::test]
async fn test_domains_survive_one_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/domains/buildings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "code": 1, "name": "Edificio 1" },
            { "code": 2, "name": "Edificio 2" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/domains/hardware-types"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/domains/space-types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["SALON", "LABORATORIO"])))
        .mount(&server)
        .await;

    let state = state_for(&server, Session::in_memory());
    let domains = state.services.domains.load_all().await;
    assert_eq!(domains.buildings.len(), 2);
    assert!(domains.hardware_types.is_empty());
    assert_eq!(domains.space_types, vec!["SALON", "LABORATORIO"]);
}

#[tokio::test]
async fn test_available_hardware_with_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/operations/hardware/availability"))
        .and(query_param("building", "5"))
        .and(query_param("getAll", "true"))
        .and(query_param("nameLike", "Port"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "code_building": 5,
            "code_warehouse": 2,
            "code_storedhw": 2,
            "name_hardware": "Portátil 2",
            "type_hardware": "Portátil",
            "name_building": "Edificio 5"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let state = state_for(&server, Session::in_memory());
    let filters = FilterDraft::new()
        .apply(FilterField::Building(Some(5)))
        .apply(FilterField::NameLike(Some("Port".to_string())));
    let available = state.services.hardware.available(&filters).await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].key(), "5-2-2");
}

#[tokio::test]
async fn test_space_history_empty_answer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/operations/space"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let state = state_for(&server, Session::in_memory());
    let history = state
        .services
        .space
        .reserved_history(&FilterDraft::new())
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_reservation_details_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/operations/space/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let state = state_for(&server, Session::in_memory());
    let err = state
        .services
        .space
        .reservation_details(404)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn test_hand_over_and_return() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/operations/space/7/handOver"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/operations/hardware/8/return"))
        .and(body_json(json!({ "conditionRate": 4, "serviceRate": 5 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let state = state_for(&server, Session::in_memory());
    let operations = &state.services.operations;
    operations.hand_over_space("7").await.unwrap();
    operations
        .return_hardware(
            "8",
            ReturnRates {
                condition_rate: 4,
                service_rate: 5,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invalid_operations_send_nothing() {
    let server = MockServer::start().await;
    let state = state_for(&server, Session::in_memory());
    let operations = &state.services.operations;

    let err = operations.cancel_space_reservation("").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = operations
        .return_space(
            "3",
            ReturnRates {
                condition_rate: 0,
                service_rate: 3,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_check_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/operations/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "UP" })))
        .mount(&server)
        .await;
    let state = state_for(&server, Session::in_memory());
    assert!(state.services.operations.check_health().await);

    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    assert!(!state.services.operations.check_health().await);
}

#[tokio::test]
async fn test_resource_info_and_admin_guard() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/listStates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "name": "DISPONIBLE", "desc": "Disponible" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/spaces/createSpacesType"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let state = state_for(&server, session.clone());
    let resources = &state.services.resources;

    let states = resources.info(INFO_SPACE_STATES).await.unwrap();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].name, "DISPONIBLE");

    let space_type = NewSpaceType {
        name: "AUDITORIO".to_string(),
        description: "Auditorio".to_string(),
    };
    session
        .set_token(token("usuario2@example.com", &["ROLE_USER"], 3600))
        .unwrap();
    let err = resources.create_space_type(&space_type).await.unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));

    session
        .set_token(token("admin@example.com", &[ROLE_ADMIN], 3600))
        .unwrap();
    resources.create_space_type(&space_type).await.unwrap();
}

#[tokio::test]
async fn test_resource_info_refused_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = state_for(&server, Session::in_memory());
    let types = state
        .services
        .resources
        .info("hardware/listTypeHardware")
        .await
        .unwrap();
    assert!(types.is_empty());
}
