//! Space reservation queries

use crate::{
    error::{AppError, AppResult},
    filter::FilterDraft,
    http::{ApiClient, RequestOptions},
    models::reservation::{AvailableSpace, ReservationDetails, SpaceReservationSummary},
};

#[derive(Clone)]
pub struct SpaceService {
    client: ApiClient,
    base_path: String,
}

impl SpaceService {
    pub fn new(client: ApiClient, operations_mapping: &str) -> Self {
        Self {
            client,
            base_path: format!("/{}/space", operations_mapping.trim_matches('/')),
        }
    }

    pub async fn reserved_history(
        &self,
        filters: &FilterDraft,
    ) -> AppResult<Vec<SpaceReservationSummary>> {
        let options =
            RequestOptions::get("getReservedSpaceHistory", self.base_path.as_str()).params(filters)?;
        Ok(self.client.send_json(options).await?.unwrap_or_default())
    }

    /// Spaces free in the filter window. Capacity and building are honoured
    /// by the backend.
    pub async fn available(&self, filters: &FilterDraft) -> AppResult<Vec<AvailableSpace>> {
        let options = RequestOptions::get(
            "getAvailableSpaces",
            format!("{}/availability", self.base_path),
        )
        .params(filters)?;
        Ok(self.client.send_json(options).await?.unwrap_or_default())
    }

    pub async fn reservation_details(&self, id: i64) -> AppResult<ReservationDetails> {
        let options = RequestOptions::get(
            "getReservedSpaceDetails",
            format!("{}/{}", self.base_path, id),
        );
        self.client
            .send_json(options)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Space reservation {} not found", id)))
    }
}
