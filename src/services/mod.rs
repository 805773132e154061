//! Backend services

pub mod auth;
pub mod domains;
pub mod hardware;
pub mod operations;
pub mod resources;
pub mod space;
pub mod troyadev;

use crate::{config::AppConfig, http::Backends};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub hardware: hardware::HardwareService,
    pub space: space::SpaceService,
    pub domains: domains::DomainsService,
    pub operations: operations::OperationsService,
    pub resources: resources::ResourcesService,
    pub troya_dev: troyadev::TroyaDevService,
}

impl Services {
    /// Create all services on top of the backend clients
    pub fn new(backends: Backends, config: &AppConfig) -> Self {
        let mapping = &config.backends.operations_mapping;
        Self {
            auth: auth::AuthService::new(backends.user),
            hardware: hardware::HardwareService::new(backends.query.clone(), mapping),
            space: space::SpaceService::new(backends.query.clone(), mapping),
            domains: domains::DomainsService::new(
                backends.query,
                &config.backends.domains_mapping,
            ),
            operations: operations::OperationsService::new(backends.operation),
            resources: resources::ResourcesService::new(backends.resource),
            troya_dev: troyadev::TroyaDevService::new(
                backends.troya_dev,
                config.troya_dev.clone(),
            ),
        }
    }
}
