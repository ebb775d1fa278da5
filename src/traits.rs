use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::catalog::{Location, Room};
use crate::error::Result;
use crate::id::ReservationId;
use crate::reservation::{Reservation, ReservationDetails};

/// A source of reservations that lives outside this process (usually a REST server).
///
/// Implementors never retry. A time-slot conflict is reported as [`Error::Conflict`](crate::error::Error::Conflict).
#[async_trait]
pub trait ReservationBackend {
    /// Returns every location
    async fn get_locations(&self) -> Result<Vec<Location>>;
    /// Returns every room of every location
    async fn get_rooms(&self) -> Result<Vec<Room>>;
    /// Returns every reservation
    async fn get_reservations(&self) -> Result<Vec<Reservation>>;

    /// Create a reservation. The returned reservation carries the id assigned by the backend
    async fn create_reservation(&self, details: &ReservationDetails) -> Result<Reservation>;
    /// Replace the whole content of an existing reservation
    async fn update_reservation(&self, id: &ReservationId, details: &ReservationDetails) -> Result<Reservation>;
    async fn delete_reservation(&self, id: &ReservationId) -> Result<()>;
}

/// Something that tells the time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
