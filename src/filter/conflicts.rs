//! Client-side availability for TroyaDev resources
//!
//! TroyaDev offers no server-side availability query, so the whole resource
//! and booking lists are fetched and filtered here.
//!
//! Known limitations, inherited from the data TroyaDev exposes:
//! - bookings reference resources by display name, so two resources sharing
//!   a name share their bookings;
//! - a booking only carries its registration instant, not a reserved
//!   interval, so a conflict means "registered inside the requested window".

use chrono::{DateTime, Utc};

use crate::models::troyadev::{TroyaDevBooking, TroyaDevResource};

/// Requested window and resource criteria
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityQuery {
    /// Case-insensitive substring of the resource name, empty for any
    pub name: String,
    /// Resource type id, `0` for any
    pub type_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AvailabilityQuery {
    fn matches(&self, resource: &TroyaDevResource) -> bool {
        let name_ok = self.name.is_empty()
            || resource
                .name
                .to_lowercase()
                .contains(&self.name.to_lowercase());
        let type_ok = self.type_id == 0 || resource.type_id == self.type_id;
        name_ok && type_ok
    }

    fn is_blocked_by(&self, booking: &TroyaDevBooking) -> bool {
        booking.status.is_blocking()
            && booking.registered_at >= self.start
            && booking.registered_at <= self.end
    }
}

/// Links bookings to the resource they reserve
pub trait BookingJoin {
    fn bookings_for<'a>(
        &self,
        resource: &TroyaDevResource,
        bookings: &'a [TroyaDevBooking],
    ) -> Vec<&'a TroyaDevBooking>;
}

/// Join on the resource display name, the only key TroyaDev bookings carry
#[derive(Debug, Clone, Copy, Default)]
pub struct NameJoin;

impl BookingJoin for NameJoin {
    fn bookings_for<'a>(
        &self,
        resource: &TroyaDevResource,
        bookings: &'a [TroyaDevBooking],
    ) -> Vec<&'a TroyaDevBooking> {
        bookings
            .iter()
            .filter(|b| b.resource_name == resource.name)
            .collect()
    }
}

/// Resources matching `query` with no blocking booking in its window
pub fn find_available_resources(
    resources: &[TroyaDevResource],
    bookings: &[TroyaDevBooking],
    query: &AvailabilityQuery,
) -> Vec<TroyaDevResource> {
    find_available_resources_with(&NameJoin, resources, bookings, query)
}

pub fn find_available_resources_with<J: BookingJoin>(
    join: &J,
    resources: &[TroyaDevResource],
    bookings: &[TroyaDevBooking],
    query: &AvailabilityQuery,
) -> Vec<TroyaDevResource> {
    resources
        .iter()
        .filter(|resource| query.matches(resource))
        .filter(|resource| {
            let blocking = join
                .bookings_for(resource, bookings)
                .into_iter()
                .filter(|booking| query.is_blocked_by(booking))
                .count();
            if blocking > 0 {
                tracing::debug!("Resource {} has {} blocking bookings", resource.name, blocking);
            }
            blocking == 0
        })
        .cloned()
        .collect()
}
