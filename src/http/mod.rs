//! HTTP access to the campus backends and TroyaDev

pub mod request;

pub use request::{ApiClient, RequestOptions};

use tokio_util::sync::CancellationToken;

use crate::{
    config::{BackendsConfig, TroyaDevConfig},
    error::{AppError, AppResult},
    session::Session,
};

/// One client per backend base URL, sharing the connection pool and session
#[derive(Clone)]
pub struct Backends {
    pub user: ApiClient,
    pub operation: ApiClient,
    pub query: ApiClient,
    pub resource: ApiClient,
    pub troya_dev: ApiClient,
}

impl Backends {
    pub fn new(
        config: &BackendsConfig,
        troya_dev: &TroyaDevConfig,
        session: Session,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("reserva-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            user: ApiClient::new(http.clone(), &config.user_url, session.clone()),
            operation: ApiClient::new(http.clone(), &config.operation_url, session.clone()),
            query: ApiClient::new(http.clone(), &config.query_url, session.clone()),
            resource: ApiClient::new(http.clone(), &config.resource_url, session.clone()),
            troya_dev: ApiClient::new(http, &troya_dev.url, session),
        })
    }

    /// Every client abandons its requests once `token` is cancelled
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            user: self.user.with_cancellation(token.clone()),
            operation: self.operation.with_cancellation(token.clone()),
            query: self.query.with_cancellation(token.clone()),
            resource: self.resource.with_cancellation(token.clone()),
            troya_dev: self.troya_dev.with_cancellation(token),
        }
    }
}
