//! Records of the TroyaDev booking system
//!
//! Field names follow the external API verbatim.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// `{ "data": ... }` wrapper used by every TroyaDev answer
#[derive(Debug, Clone, Deserialize)]
pub struct TroyaDevEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TroyaDevLoginData {
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TroyaDevResource {
    #[serde(rename = "recu_ID")]
    pub id: i64,
    /// Resource type id
    #[serde(rename = "tireid")]
    pub type_id: i64,
    #[serde(rename = "recu_NOMBRE")]
    pub name: String,
    #[serde(rename = "recu_FECHA_REGISTRO", deserialize_with = "flexible_datetime")]
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TroyaDevResourceType {
    #[serde(rename = "tire_ID")]
    pub id: i64,
    #[serde(rename = "tire_DESCRIPCION")]
    pub description: Option<String>,
    #[serde(rename = "tire_FECHA_REGISTRO", deserialize_with = "flexible_datetime")]
    pub registered_at: DateTime<Utc>,
    #[serde(rename = "tire_NOMBRE")]
    pub name: String,
}

/// Booking state as reported by TroyaDev
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    /// Created, resource not yet delivered
    Creada,
    /// Resource delivered to the user
    Entregada,
    /// Resource given back
    Devuelta,
    Other(String),
}

impl BookingStatus {
    /// Whether a booking in this state keeps the resource busy
    pub fn is_blocking(&self) -> bool {
        matches!(self, BookingStatus::Creada | BookingStatus::Entregada)
    }
}

impl From<String> for BookingStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CREADA" => BookingStatus::Creada,
            "ENTREGADA" => BookingStatus::Entregada,
            "DEVUELTA" => BookingStatus::Devuelta,
            _ => BookingStatus::Other(value),
        }
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Creada => "CREADA".to_string(),
            BookingStatus::Entregada => "ENTREGADA".to_string(),
            BookingStatus::Devuelta => "DEVUELTA".to_string(),
            BookingStatus::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TroyaDevBooking {
    #[serde(rename = "usua_NOMBRES")]
    pub user_first_names: Option<String>,
    #[serde(rename = "usua_APELLIDOS")]
    pub user_last_names: Option<String>,
    #[serde(rename = "usua_CORREO")]
    pub user_email: Option<String>,
    #[serde(rename = "rese_ID")]
    pub id: i64,
    /// Name of the booked resource, the only link to a resource record
    #[serde(rename = "recu_NOMBRE")]
    pub resource_name: String,
    #[serde(rename = "rese_ESTADO")]
    pub status: BookingStatus,
    #[serde(rename = "usua_CLIENTE")]
    pub user_client: Option<i64>,
    #[serde(rename = "rese_CALIFICACION")]
    pub rating: Option<i32>,
    #[serde(rename = "rese_FECHA_REGISTRO", deserialize_with = "flexible_datetime")]
    pub registered_at: DateTime<Utc>,
}

/// Accepts RFC 3339, offset-less timestamps and plain dates (read as UTC),
/// or epoch milliseconds.
fn flexible_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", ms))),
        Raw::Text(text) => parse_timestamp(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", text))),
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
