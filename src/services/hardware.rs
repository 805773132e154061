//! Hardware reservation queries

use crate::{
    error::{AppError, AppResult},
    filter::FilterDraft,
    http::{ApiClient, RequestOptions},
    models::reservation::{AvailableHardware, HardwareReservationSummary, ReservationDetails},
};

#[derive(Clone)]
pub struct HardwareService {
    client: ApiClient,
    base_path: String,
}

impl HardwareService {
    pub fn new(client: ApiClient, operations_mapping: &str) -> Self {
        Self {
            client,
            base_path: format!("/{}/hardware", operations_mapping.trim_matches('/')),
        }
    }

    /// Reserved hardware matching the filters
    pub async fn reserved_history(
        &self,
        filters: &FilterDraft,
    ) -> AppResult<Vec<HardwareReservationSummary>> {
        let options =
            RequestOptions::get("getReservedHardwareHistory", self.base_path.as_str()).params(filters)?;
        Ok(self.client.send_json(options).await?.unwrap_or_default())
    }

    /// Stored hardware free in the filter window
    pub async fn available(&self, filters: &FilterDraft) -> AppResult<Vec<AvailableHardware>> {
        let options = RequestOptions::get(
            "getAvailableHardware",
            format!("{}/availability", self.base_path),
        )
        .params(filters)?;
        Ok(self.client.send_json(options).await?.unwrap_or_default())
    }

    pub async fn reservation_details(&self, id: i64) -> AppResult<ReservationDetails> {
        let options = RequestOptions::get(
            "getReservedHardwareDetails",
            format!("{}/{}", self.base_path, id),
        );
        self.client
            .send_json(options)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Hardware reservation {} not found", id)))
    }
}
