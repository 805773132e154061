//! Filter composition for availability and history queries

pub mod compose;
pub mod conflicts;
pub mod datetime;
pub mod debounce;

pub use compose::{FilterDraft, FilterField, FilterForm, WindowPolicy};
pub use conflicts::{find_available_resources, AvailabilityQuery, BookingJoin, NameJoin};
pub use datetime::{create_iso_string_from_date_time, date_from_iso, time_from_iso, Bound};
pub use debounce::Debouncer;
