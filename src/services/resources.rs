//! Resource administration on the resource backend

use serde::Deserialize;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    http::{request::decode, ApiClient, RequestOptions},
    models::domain::{NewHardware, NewHardwareType, NewSpace, NewSpaceType, TypeOrState},
};

/// Lists the resource backend can describe through [`ResourcesService::info`]
pub const INFO_SPACE_STATES: &str = "spaces/listStates";
pub const INFO_SPACE_TYPES: &str = "spaces/listTypeSpace";
pub const INFO_HARDWARE_TYPES: &str = "hardware/listTypeHardware";

#[derive(Debug, Deserialize)]
struct InfoEnvelope {
    #[serde(default)]
    data: Vec<TypeOrState>,
}

#[derive(Clone)]
pub struct ResourcesService {
    client: ApiClient,
}

impl ResourcesService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn require_admin(&self) -> AppResult<()> {
        if self.client.session().is_admin() {
            Ok(())
        } else {
            Err(AppError::Authentication(
                "Resource administration requires an administrator".to_string(),
            ))
        }
    }

    pub async fn create_hardware_type(&self, hardware_type: &NewHardwareType) -> AppResult<()> {
        self.require_admin()?;
        hardware_type.validate()?;
        let options = RequestOptions::post("sendTypeHardware", "/hardware/createHardwareType")
            .body(hardware_type)?;
        self.client.send(options).await?;
        tracing::info!("Hardware type {} created", hardware_type.name);
        Ok(())
    }

    pub async fn create_space_type(&self, space_type: &NewSpaceType) -> AppResult<()> {
        self.require_admin()?;
        space_type.validate()?;
        let options =
            RequestOptions::post("sendTypeSpace", "/spaces/createSpacesType").body(space_type)?;
        self.client.send(options).await?;
        tracing::info!("Space type {} created", space_type.name);
        Ok(())
    }

    pub async fn create_hardware(&self, hardware: &NewHardware) -> AppResult<()> {
        self.require_admin()?;
        hardware.validate()?;
        let options =
            RequestOptions::post("sendHardware", "/hardware/createHardware").body(hardware)?;
        self.client.send(options).await?;
        tracing::info!("Hardware {} created", hardware.name_hardware);
        Ok(())
    }

    pub async fn create_space(&self, space: &NewSpace) -> AppResult<()> {
        self.require_admin()?;
        space.validate()?;
        let options = RequestOptions::post("sendSpace", "/spaces/createSpaces").body(space)?;
        self.client.send(options).await?;
        tracing::info!("Space {} created", space.name_space);
        Ok(())
    }

    /// Types or states listed under `path`. A refused request yields an empty list.
    pub async fn info(&self, path: &str) -> AppResult<Vec<TypeOrState>> {
        let options = RequestOptions::get("getInfoResource", path);
        let request_name = options.request_name.clone();
        match self.client.send(options).await {
            Ok(value) => Ok(decode::<InfoEnvelope>(&request_name, value)?
                .map(|envelope| envelope.data)
                .unwrap_or_default()),
            Err(e @ AppError::Http { .. }) => {
                tracing::warn!("{}", e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
