//! Data models exchanged with the backends

pub mod domain;
pub mod enums;
pub mod reservation;
pub mod troyadev;
pub mod user;

// Re-export commonly used types
pub use domain::{Building, Domains};
pub use enums::{ReservationStatus, ResourceKind};
pub use reservation::{
    AvailableHardware, AvailableSpace, HardwareReservationSummary, NewHardwareReservation,
    NewSpaceReservation, ReservationDetails, ReturnRates, SpaceReservationSummary,
};
pub use troyadev::{BookingStatus, TroyaDevBooking, TroyaDevResource, TroyaDevResourceType};
pub use user::{LoginRequest, RegisterUser, TokenClaims};
