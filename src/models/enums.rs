//! Shared domain enums

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a reservation as reported by the operation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Pending,
    Completed,
    Past,
    Cancelled,
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ReservationStatus::Active),
            "pending" => Ok(ReservationStatus::Pending),
            "completed" => Ok(ReservationStatus::Completed),
            "past" => Ok(ReservationStatus::Past),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("Unknown reservation status: {}", other)),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReservationStatus::Active => "Activa",
            ReservationStatus::Pending => "Pendiente",
            ReservationStatus::Completed => "Completada",
            ReservationStatus::Past => "Pasada",
            ReservationStatus::Cancelled => "Cancelada",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// ResourceKind
// ---------------------------------------------------------------------------

/// The two kinds of reservable resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Hardware,
    Space,
}

impl ResourceKind {
    /// Path segment used by the operation endpoints
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Hardware => "hardware",
            ResourceKind::Space => "space",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
