//! Reserva client
//!
//! Client library for the campus reservation backends: filter composition
//! for availability and history views, request helpers for the user,
//! operation, query and resource services, session handling, and
//! availability of TroyaDev resources computed on the client.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod models;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use session::{FileStore, Session};
use tokio_util::sync::CancellationToken;

/// Application state shared by the commands
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session: Session,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Open the persisted session and build every service. Requests in
    /// flight are abandoned once `cancel` fires.
    pub fn new(config: AppConfig, cancel: CancellationToken) -> AppResult<Self> {
        let session = Session::open(Arc::new(FileStore::new(config.session.path.clone())))?;
        Self::with_session(config, session, cancel)
    }

    pub fn with_session(
        config: AppConfig,
        session: Session,
        cancel: CancellationToken,
    ) -> AppResult<Self> {
        let backends = http::Backends::new(&config.backends, &config.troya_dev, session.clone())?
            .with_cancellation(cancel);
        let services = services::Services::new(backends, &config);
        Ok(Self {
            config: Arc::new(config),
            session,
            services: Arc::new(services),
        })
    }
}
