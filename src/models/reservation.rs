//! Reservation models and related types

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::enums::ReservationStatus;
use crate::error::{AppError, AppResult};

/// Row of the hardware reservation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareReservationSummary {
    pub code_reshw: i64,
    pub name_building: String,
    pub code_warehouse: i64,
    pub name_hardware: String,
    pub type_hardware: String,
    pub day_reshw: NaiveDate,
}

/// Row of the space reservation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceReservationSummary {
    pub code_resspace: i64,
    pub name_building: String,
    pub code_space: i64,
    pub name_space: String,
    pub type_space: String,
    pub capacity_space: i32,
    pub day_resspace: NaiveDate,
}

/// Stored hardware free in the requested window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableHardware {
    pub code_building: i64,
    pub code_warehouse: i64,
    pub code_storedhw: i64,
    pub name_hardware: String,
    pub type_hardware: String,
    pub name_building: String,
}

impl AvailableHardware {
    /// `building-warehouse-stored` key used by the detail views
    pub fn key(&self) -> String {
        format!(
            "{}-{}-{}",
            self.code_building, self.code_warehouse, self.code_storedhw
        )
    }
}

/// Space free in the requested window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSpace {
    pub code_space: i64,
    pub code_building: i64,
    pub name_space: String,
    pub type_space: String,
    pub name_building: String,
    pub capacity_space: i32,
}

impl AvailableSpace {
    pub fn key(&self) -> String {
        format!("{}-{}", self.code_building, self.code_space)
    }
}

/// Person attached to a reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Party {
    Email(String),
    User {
        email: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        code: Option<i64>,
    },
}

impl Party {
    pub fn email(&self) -> &str {
        match self {
            Party::Email(email) => email,
            Party::User { email, .. } => email,
        }
    }
}

/// Reservation detail (hardware or space)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDetails {
    pub code: i64,
    /// Reserved space record, as returned by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<Value>,
    /// Reserved stored hardware record, as returned by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_hardware: Option<Value>,
    pub requester: Party,
    #[serde(default)]
    pub manager: Option<Party>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub handover_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub return_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub condition_rate: Option<u8>,
    #[serde(default)]
    pub service_rate: Option<u8>,
    #[serde(default)]
    pub status: Option<ReservationStatus>,
}

impl ReservationDetails {
    pub fn is_handed_over(&self) -> bool {
        self.handover_date.is_some()
    }

    pub fn is_returned(&self) -> bool {
        self.return_date.is_some()
    }
}

/// Create hardware reservation request
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewHardwareReservation {
    pub building: i32,
    pub resource_code: i32,
    pub stored_resource_code: i32,
    #[validate(email(message = "Invalid requester email"))]
    pub requester: String,
    #[validate(email(message = "Invalid manager email"))]
    pub manager: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Create space reservation request
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSpaceReservation {
    pub building: i32,
    pub resource_code: i32,
    #[validate(email(message = "Invalid requester email"))]
    pub requester: String,
    #[validate(email(message = "Invalid manager email"))]
    pub manager: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Start must precede end
pub fn check_window(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> AppResult<()> {
    if start >= end {
        return Err(AppError::Validation(
            "Reservation start must be before its end".to_string(),
        ));
    }
    Ok(())
}

/// Ratings given when a resource comes back
#[derive(Debug, Clone, Copy, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRates {
    #[validate(range(min = 1, max = 5, message = "Condition rate must be between 1 and 5"))]
    pub condition_rate: u8,
    #[validate(range(min = 1, max = 5, message = "Service rate must be between 1 and 5"))]
    pub service_rate: u8,
}
