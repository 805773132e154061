//! Configuration management for the reservation client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Base URLs of the four campus backends
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendsConfig {
    pub user_url: String,
    pub operation_url: String,
    pub query_url: String,
    pub resource_url: String,
    /// Path prefix of the operation query endpoints
    pub operations_mapping: String,
    /// Path prefix of the lookup domain endpoints
    pub domains_mapping: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TroyaDevConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub login_endpoint: String,
    pub resource_endpoint: String,
    pub resource_type_endpoint: String,
    pub booking_endpoint: String,
    /// Lifetime of a TroyaDev session token
    pub session_minutes: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    /// File holding the persisted tokens
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FiltersConfig {
    pub debounce_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub backends: BackendsConfig,
    #[serde(default)]
    pub troya_dev: TroyaDevConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables, e.g. RESERVA_BACKENDS__QUERY_URL
            .add_source(
                Environment::with_prefix("RESERVA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Variable names shared with the web front end deployment
            .set_override_option("backends.user_url", env::var("VITE_USER_API_URL").ok())?
            .set_override_option(
                "backends.operation_url",
                env::var("VITE_OPERATION_API_URL").ok(),
            )?
            .set_override_option("backends.query_url", env::var("VITE_QUERY_API_URL").ok())?
            .set_override_option(
                "backends.resource_url",
                env::var("VITE_RESOURCE_API_URL").ok(),
            )?
            .set_override_option(
                "backends.operations_mapping",
                env::var("VITE_OPERATION_QUERIES_REQUEST_MAPPING").ok(),
            )?
            .set_override_option(
                "backends.domains_mapping",
                env::var("VITE_DOMAIN_QUERIES_REQUEST_MAPPING").ok(),
            )?
            .set_override_option("troya_dev.url", env::var("VITE_TROYA_DEV_API_URL").ok())?
            .set_override_option(
                "troya_dev.username",
                env::var("VITE_TROYA_DEV_USERNAME").ok(),
            )?
            .set_override_option(
                "troya_dev.password",
                env::var("VITE_TROYA_DEV_PASSWORD").ok(),
            )?
            .set_override_option(
                "troya_dev.login_endpoint",
                env::var("VITE_TROYA_DEV_LOGIN_URL").ok(),
            )?
            .set_override_option(
                "troya_dev.resource_endpoint",
                env::var("VITE_TROYA_DEV_RESOURCE_ENDPOINT").ok(),
            )?
            .set_override_option(
                "troya_dev.resource_type_endpoint",
                env::var("VITE_TROYA_DEV_RESOURCE_TYPE_ENDPOINT").ok(),
            )?
            .set_override_option(
                "troya_dev.booking_endpoint",
                env::var("VITE_TROYA_DEV_BOOKING_ENDPOINT").ok(),
            )?
            .build()?;

        config.try_deserialize()
    }
}

impl FiltersConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl TroyaDevConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_minutes * 60)
    }
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            user_url: "http://localhost:8080".to_string(),
            operation_url: "http://localhost:8081".to_string(),
            query_url: "http://localhost:8082".to_string(),
            resource_url: "http://localhost:8083".to_string(),
            operations_mapping: "api/operations".to_string(),
            domains_mapping: "api/domains".to_string(),
        }
    }
}

impl Default for TroyaDevConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8090".to_string(),
            username: None,
            password: None,
            login_endpoint: "auth/login".to_string(),
            resource_endpoint: "resource/all".to_string(),
            resource_type_endpoint: "resource/type/all".to_string(),
            booking_endpoint: "booking/all".to_string(),
            session_minutes: 60,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".reserva/session.json"),
        }
    }
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
