//! TroyaDev booking system client

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::Mutex;

use crate::{
    config::TroyaDevConfig,
    error::{AppError, AppResult},
    filter::conflicts::{find_available_resources, AvailabilityQuery},
    http::{request::decode, ApiClient, RequestOptions},
    models::troyadev::{
        TroyaDevBooking, TroyaDevEnvelope, TroyaDevLoginData, TroyaDevResource,
        TroyaDevResourceType,
    },
};

/// Anything able to list TroyaDev resources and bookings
#[async_trait]
pub trait BookingSource: Send + Sync {
    async fn resources(&self) -> AppResult<Vec<TroyaDevResource>>;

    async fn bookings(&self) -> AppResult<Vec<TroyaDevBooking>>;
}

/// Fetch resources and bookings concurrently, then keep the resources free
/// in the query window.
pub async fn available_from<S: BookingSource + ?Sized>(
    source: &S,
    query: &AvailabilityQuery,
) -> AppResult<Vec<TroyaDevResource>> {
    let (resources, bookings) = tokio::try_join!(source.resources(), source.bookings())?;
    let available = find_available_resources(&resources, &bookings, query);
    tracing::info!(
        "{} of {} TroyaDev resources available",
        available.len(),
        resources.len()
    );
    Ok(available)
}

#[derive(Clone)]
pub struct TroyaDevService {
    client: ApiClient,
    config: TroyaDevConfig,
    /// Serializes logins so concurrent calls share one token
    login_lock: Arc<Mutex<()>>,
}

impl TroyaDevService {
    pub fn new(client: ApiClient, config: TroyaDevConfig) -> Self {
        Self {
            client,
            config,
            login_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Log in with the configured credentials and cache the token
    pub async fn login(&self) -> AppResult<String> {
        let (Some(email), Some(password)) = (&self.config.username, &self.config.password) else {
            return Err(AppError::Authentication(
                "TroyaDev credentials are not configured".to_string(),
            ));
        };

        let options = RequestOptions::post("login", self.config.login_endpoint.as_str())
            .body(&json!({ "email": email, "password": password }))?;
        let value = self.client.send_with_token(options, None).await?;
        let token = decode::<TroyaDevEnvelope<TroyaDevLoginData>>("login", value)?
            .and_then(|envelope| envelope.data.token)
            .ok_or_else(|| {
                AppError::Authentication("Login response does not contain a token".to_string())
            })?;

        self.client
            .session()
            .set_troya_dev_token(&token, Utc::now().timestamp_millis())?;
        tracing::info!("Logged in to TroyaDev as {}", email);
        Ok(token)
    }

    /// Cached token, refreshed by a new login once the session lifetime is over
    pub async fn token(&self) -> AppResult<String> {
        let _guard = self.login_lock.lock().await;
        let cached = self
            .client
            .session()
            .troya_dev_token(self.config.session_ttl(), Utc::now().timestamp_millis())?;
        match cached {
            Some(token) => Ok(token),
            None => self.login().await,
        }
    }

    async fn fetch_data<T: DeserializeOwned>(&self, request_name: &str, endpoint: &str) -> AppResult<T> {
        let token = self.token().await?;
        let options = RequestOptions::get(request_name, endpoint);
        let value = self.client.send_with_token(options, Some(&token)).await?;
        decode::<TroyaDevEnvelope<T>>(request_name, value)?
            .map(|envelope| envelope.data)
            .ok_or_else(|| AppError::Decode {
                request: request_name.to_string(),
                message: "empty response".to_string(),
            })
    }

    pub async fn resource_types(&self) -> AppResult<Vec<TroyaDevResourceType>> {
        self.fetch_data("getAllResourceTypes", &self.config.resource_type_endpoint)
            .await
    }

    /// Resources free in the query window
    pub async fn available(&self, query: &AvailabilityQuery) -> AppResult<Vec<TroyaDevResource>> {
        available_from(self, query).await
    }
}

#[async_trait]
impl BookingSource for TroyaDevService {
    async fn resources(&self) -> AppResult<Vec<TroyaDevResource>> {
        self.fetch_data("getAllResources", &self.config.resource_endpoint)
            .await
    }

    async fn bookings(&self) -> AppResult<Vec<TroyaDevBooking>> {
        self.fetch_data("getAllBookings", &self.config.booking_endpoint)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::troyadev::BookingStatus;
    use chrono::{DateTime, TimeZone};

    struct Fixed {
        resources: Vec<TroyaDevResource>,
        bookings: Vec<TroyaDevBooking>,
    }

    #[async_trait]
    impl BookingSource for Fixed {
        async fn resources(&self) -> AppResult<Vec<TroyaDevResource>> {
            Ok(self.resources.clone())
        }

        async fn bookings(&self) -> AppResult<Vec<TroyaDevBooking>> {
            Ok(self.bookings.clone())
        }
    }

    struct Broken;

    #[async_trait]
    impl BookingSource for Broken {
        async fn resources(&self) -> AppResult<Vec<TroyaDevResource>> {
            Ok(Vec::new())
        }

        async fn bookings(&self) -> AppResult<Vec<TroyaDevBooking>> {
            Err(AppError::Transport {
                request: "getAllBookings".to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    fn resource(id: i64, name: &str) -> TroyaDevResource {
        TroyaDevResource {
            id,
            type_id: 1,
            name: name.to_string(),
            registered_at: at(1, 0),
        }
    }

    #[tokio::test]
    async fn test_available_from_source() {
        let source = Fixed {
            resources: vec![resource(1, "Proyector A"), resource(2, "Proyector B")],
            bookings: vec![TroyaDevBooking {
                user_first_names: None,
                user_last_names: None,
                user_email: None,
                id: 9,
                resource_name: "Proyector A".to_string(),
                status: BookingStatus::Creada,
                user_client: None,
                rating: None,
                registered_at: at(10, 9),
            }],
        };
        let query = AvailabilityQuery {
            name: String::new(),
            type_id: 0,
            start: at(10, 8),
            end: at(10, 12),
        };
        let available = available_from(&source, &query).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "Proyector B");
    }

    #[tokio::test]
    async fn test_available_fails_with_either_fetch() {
        let query = AvailabilityQuery {
            name: String::new(),
            type_id: 0,
            start: at(10, 8),
            end: at(10, 12),
        };
        let err = available_from(&Broken, &query).await.unwrap_err();
        assert!(matches!(err, AppError::Transport { .. }));
    }
}
