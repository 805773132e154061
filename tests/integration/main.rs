//! Integration tests against mocked backends
//!
//! Every backend URL points at a `wiremock` server; nothing leaves the machine.

mod http_tests;
mod services_tests;
mod troyadev_tests;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reserva_client::{
    config::{AppConfig, BackendsConfig, TroyaDevConfig},
    session::Session,
    AppState,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

/// Configuration with every backend served by `server`
pub fn config_for(server: &MockServer) -> AppConfig {
    let uri = server.uri();
    AppConfig {
        backends: BackendsConfig {
            user_url: uri.clone(),
            operation_url: uri.clone(),
            query_url: uri.clone(),
            resource_url: uri.clone(),
            ..Default::default()
        },
        troya_dev: TroyaDevConfig {
            url: uri,
            username: Some("integracion@example.com".to_string()),
            password: Some("secreto".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn state_for(server: &MockServer, session: Session) -> AppState {
    AppState::with_session(config_for(server), session, CancellationToken::new())
        .expect("state")
}

/// Token signed with a throwaway secret, expiring `ttl_secs` from now
pub fn token(sub: &str, roles: &[&str], ttl_secs: i64) -> String {
    encode(
        &Header::default(),
        &json!({ "sub": sub, "roles": roles, "exp": Utc::now().timestamp() + ttl_secs }),
        &EncodingKey::from_secret(b"integration"),
    )
    .expect("token encoding")
}
