//! Lookup domains and resource administration records

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Building option of the filter dropdowns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub code: i32,
    pub name: String,
}

/// Lookup domains a filter panel needs
#[derive(Debug, Clone, Default, Serialize)]
pub struct Domains {
    pub buildings: Vec<Building>,
    pub hardware_types: Vec<String>,
    pub space_types: Vec<String>,
}

/// Type or state entry listed by the resource backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeOrState {
    pub name: String,
    pub desc: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewHardwareType {
    #[serde(rename = "name_hardwareType")]
    #[validate(length(min = 1, message = "Type name is required"))]
    pub name: String,
    #[serde(rename = "desc_hardwareType")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewSpaceType {
    #[serde(rename = "name_spaceType")]
    #[validate(length(min = 1, message = "Type name is required"))]
    pub name: String,
    #[serde(rename = "desc_spaceType")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewHardware {
    #[validate(length(min = 1, message = "Hardware type is required"))]
    pub type_hardware: String,
    #[validate(length(min = 1, message = "Hardware name is required"))]
    pub name_hardware: String,
    pub schedule_hardware: String,
    pub desc_hardware: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewSpace {
    pub code_space: i32,
    pub building_space: i32,
    #[validate(length(min = 1, message = "Space type is required"))]
    pub type_space: String,
    pub state_space: String,
    #[validate(length(min = 1, message = "Space name is required"))]
    pub name_space: String,
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity_space: i32,
    pub schedule_space: String,
    pub desc_space: String,
}
