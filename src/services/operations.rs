//! Reservation lifecycle on the operation backend

use serde_json::Value;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    http::{ApiClient, RequestOptions},
    models::{
        enums::ResourceKind,
        reservation::{check_window, NewHardwareReservation, NewSpaceReservation, ReturnRates},
    },
};

const BASE_PATH: &str = "/api/operations";

#[derive(Clone)]
pub struct OperationsService {
    client: ApiClient,
}

/// Reservation ids are used as a path segment
fn reservation_id(id: &str) -> AppResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::Validation("Reservation id is required".to_string()));
    }
    if id.contains(['/', '?', '#']) {
        return Err(AppError::Validation(format!("Invalid reservation id: {}", id)));
    }
    Ok(id)
}

impl OperationsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn path(kind: ResourceKind, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", BASE_PATH, kind.path(), id),
            None => format!("{}/{}", BASE_PATH, kind.path()),
        }
    }

    pub async fn create_hardware_reservation(
        &self,
        reservation: &NewHardwareReservation,
    ) -> AppResult<Option<Value>> {
        reservation.validate()?;
        check_window(&reservation.start, &reservation.end)?;

        let options = RequestOptions::post(
            "createHardwareReservation",
            Self::path(ResourceKind::Hardware, None),
        )
        .body(reservation)?;
        let created = self.client.send(options).await?;
        tracing::info!(
            "Hardware reservation created for {} (stored hardware {})",
            reservation.requester,
            reservation.stored_resource_code
        );
        Ok(created)
    }

    pub async fn create_space_reservation(
        &self,
        reservation: &NewSpaceReservation,
    ) -> AppResult<Option<Value>> {
        reservation.validate()?;
        check_window(&reservation.start, &reservation.end)?;

        let options = RequestOptions::post(
            "createSpaceReservation",
            Self::path(ResourceKind::Space, None),
        )
        .body(reservation)?;
        let created = self.client.send(options).await?;
        tracing::info!(
            "Space reservation created for {} (space {})",
            reservation.requester,
            reservation.resource_code
        );
        Ok(created)
    }

    pub async fn cancel_hardware_reservation(&self, id: &str) -> AppResult<()> {
        self.cancel(ResourceKind::Hardware, id).await
    }

    pub async fn cancel_space_reservation(&self, id: &str) -> AppResult<()> {
        self.cancel(ResourceKind::Space, id).await
    }

    pub async fn hand_over_hardware(&self, id: &str) -> AppResult<()> {
        self.hand_over(ResourceKind::Hardware, id).await
    }

    pub async fn hand_over_space(&self, id: &str) -> AppResult<()> {
        self.hand_over(ResourceKind::Space, id).await
    }

    pub async fn return_hardware(&self, id: &str, rates: ReturnRates) -> AppResult<()> {
        self.give_back(ResourceKind::Hardware, id, rates).await
    }

    pub async fn return_space(&self, id: &str, rates: ReturnRates) -> AppResult<()> {
        self.give_back(ResourceKind::Space, id, rates).await
    }

    /// Delete a reservation
    pub async fn cancel(&self, kind: ResourceKind, id: &str) -> AppResult<()> {
        let id = reservation_id(id)?;
        let options = RequestOptions::delete(
            &format!("delete{}Reservation", label(kind)),
            Self::path(kind, Some(id)),
        );
        self.client.send(options).await?;
        tracing::info!("{} reservation {} cancelled", kind, id);
        Ok(())
    }

    /// Record that the resource was handed to the requester
    pub async fn hand_over(&self, kind: ResourceKind, id: &str) -> AppResult<()> {
        let id = reservation_id(id)?;
        let options = RequestOptions::post(
            &format!("handOver{}", label(kind)),
            format!("{}/handOver", Self::path(kind, Some(id))),
        );
        self.client.send(options).await?;
        tracing::info!("{} reservation {} handed over", kind, id);
        Ok(())
    }

    /// Record the return of the resource with its ratings
    pub async fn give_back(&self, kind: ResourceKind, id: &str, rates: ReturnRates) -> AppResult<()> {
        let id = reservation_id(id)?;
        rates.validate()?;
        let options = RequestOptions::post(
            &format!("return{}", label(kind)),
            format!("{}/return", Self::path(kind, Some(id))),
        )
        .body(&rates)?;
        self.client.send(options).await?;
        tracing::info!(
            "{} reservation {} returned (condition {}, service {})",
            kind,
            id,
            rates.condition_rate,
            rates.service_rate
        );
        Ok(())
    }

    /// Whether the operation backend answers its health probe
    pub async fn check_health(&self) -> bool {
        let options = RequestOptions::get("checkHealth", format!("{}/health", BASE_PATH));
        match self.client.send(options).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Operation backend unhealthy: {}", e);
                false
            }
        }
    }
}

fn label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Hardware => "Hardware",
        ResourceKind::Space => "Space",
    }
}
