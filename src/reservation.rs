//! Room reservations

use chrono::{DateTime, Utc};

use crate::id::ReservationId;
use crate::status::ReservationStatus;

/// Everything a reservation is made of, apart from its id.
///
/// This is what is sent to the backend when creating or updating a reservation.
#[derive(Clone, Debug, PartialEq)]
pub struct ReservationDetails {
    pub location: String,
    pub room: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub responsible_person: String,
    pub description: Option<String>,
    pub coffee: bool,
    /// Only meaningful when `coffee` is set
    pub coffee_quantity: Option<u32>,
}

/// A booking of a room at a location for a time interval
#[derive(Clone, Debug, PartialEq)]
pub struct Reservation {
    id: ReservationId,
    details: ReservationDetails,
}

impl Reservation {
    pub fn new(id: ReservationId, details: ReservationDetails) -> Self {
        Self { id, details }
    }

    pub fn id(&self) -> &ReservationId { &self.id }
    pub fn details(&self) -> &ReservationDetails { &self.details }
    pub fn location(&self) -> &str { &self.details.location }
    pub fn room(&self) -> &str { &self.details.room }
    pub fn start(&self) -> DateTime<Utc> { self.details.start }
    pub fn end(&self) -> DateTime<Utc> { self.details.end }
    pub fn responsible_person(&self) -> &str { &self.details.responsible_person }
    pub fn description(&self) -> Option<&str> { self.details.description.as_deref() }
    pub fn coffee(&self) -> bool { self.details.coffee }

    /// The number of people coffee is requested for, or `None` when no coffee is requested
    pub fn coffee_quantity(&self) -> Option<u32> {
        if self.details.coffee {
            self.details.coffee_quantity
        } else {
            None
        }
    }

    /// The status of this reservation at `now`. This is never cached, call it again whenever `now` changes.
    pub fn status_at(&self, now: DateTime<Utc>) -> ReservationStatus {
        ReservationStatus::at(now, self.start(), self.end())
    }
}
