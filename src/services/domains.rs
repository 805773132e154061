//! Lookup domains for the filter dropdowns

use crate::{
    error::AppResult,
    http::{ApiClient, RequestOptions},
    models::domain::{Building, Domains},
};

#[derive(Clone)]
pub struct DomainsService {
    client: ApiClient,
    base_path: String,
}

impl DomainsService {
    pub fn new(client: ApiClient, domains_mapping: &str) -> Self {
        Self {
            client,
            base_path: format!("/{}", domains_mapping.trim_matches('/')),
        }
    }

    pub async fn buildings(&self) -> AppResult<Vec<Building>> {
        let options = RequestOptions::get(
            "getBuildingsDomain",
            format!("{}/buildings", self.base_path),
        );
        Ok(self.client.send_json(options).await?.unwrap_or_default())
    }

    pub async fn hardware_types(&self) -> AppResult<Vec<String>> {
        let options = RequestOptions::get(
            "getHardwareTypesDomain",
            format!("{}/hardware-types", self.base_path),
        );
        Ok(self.client.send_json(options).await?.unwrap_or_default())
    }

    pub async fn space_types(&self) -> AppResult<Vec<String>> {
        let options = RequestOptions::get(
            "getSpaceTypesDomain",
            format!("{}/space-types", self.base_path),
        );
        Ok(self.client.send_json(options).await?.unwrap_or_default())
    }

    /// Fetch the three domains concurrently. A failed lookup is logged and
    /// leaves its list empty; the others are still returned.
    pub async fn load_all(&self) -> Domains {
        let (buildings, hardware_types, space_types) =
            tokio::join!(self.buildings(), self.hardware_types(), self.space_types());

        Domains {
            buildings: or_empty("buildings", buildings),
            hardware_types: or_empty("hardware types", hardware_types),
            space_types: or_empty("space types", space_types),
        }
    }
}

fn or_empty<T>(what: &str, result: AppResult<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!("Error fetching {}: {}", what, e);
        Vec::new()
    })
}
