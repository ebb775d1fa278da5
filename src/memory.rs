//! An in-memory [`ReservationBackend`], used to exercise the rest of this crate without a server
#![cfg(feature = "mock_backend")]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::catalog::{Location, Room};
use crate::error::{Error, Result};
use crate::id::ReservationId;
use crate::mock_behaviour::MockBehaviour;
use crate::reservation::{Reservation, ReservationDetails};
use crate::traits::ReservationBackend;

#[derive(Debug, Default)]
struct MemoryData {
    locations: Vec<Location>,
    rooms: Vec<Room>,
    reservations: Vec<Reservation>,
    last_id: i64,
}

/// A backend that stores everything in memory and assigns sequential ids.
///
/// Its failures can be scripted with a [`MockBehaviour`]
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: Mutex<MemoryData>,
    mock_behaviour: Arc<Mutex<MockBehaviour>>,
}

impl MemoryBackend {
    pub fn new(locations: Vec<Location>, rooms: Vec<Room>) -> Self {
        Self {
            data: Mutex::new(MemoryData{ locations, rooms, ..MemoryData::default() }),
            mock_behaviour: Arc::new(Mutex::new(MockBehaviour::default())),
        }
    }

    /// A handle to the mock behaviour of this backend, that remains usable once the backend has been moved
    pub fn mock_behaviour(&self) -> Arc<Mutex<MockBehaviour>> {
        Arc::clone(&self.mock_behaviour)
    }

    /// Replace the current mock behaviour
    pub fn set_mock_behaviour(&self, behaviour: MockBehaviour) -> Result<()> {
        *lock(&self.mock_behaviour)? = behaviour;
        Ok(())
    }

    /// Store a reservation as if it had been created earlier
    pub fn insert(&self, details: ReservationDetails) -> Result<Reservation> {
        let mut data = lock(&self.data)?;
        data.last_id += 1;
        let reservation = Reservation::new(ReservationId::from(data.last_id), details);
        data.reservations.push(reservation.clone());
        Ok(reservation)
    }

    /// What this backend currently stores
    pub fn reservations(&self) -> Result<Vec<Reservation>> {
        Ok(lock(&self.data)?.reservations.clone())
    }

    fn behaviour(&self) -> Result<MutexGuard<'_, MockBehaviour>> {
        lock(&self.mock_behaviour)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex.lock().map_err(|_| Error::request("in-memory backend state is poisoned"))
}

fn not_found(id: &ReservationId) -> Error {
    Error::from_response(404, Some("Not Found"), &format!(r#"{{"detail": "Reservation {} not found"}}"#, id))
}

#[async_trait]
impl ReservationBackend for MemoryBackend {
    async fn get_locations(&self) -> Result<Vec<Location>> {
        self.behaviour()?.can_get_locations()?;
        Ok(lock(&self.data)?.locations.clone())
    }

    async fn get_rooms(&self) -> Result<Vec<Room>> {
        self.behaviour()?.can_get_rooms()?;
        Ok(lock(&self.data)?.rooms.clone())
    }

    async fn get_reservations(&self) -> Result<Vec<Reservation>> {
        self.behaviour()?.can_get_reservations()?;
        self.reservations()
    }

    async fn create_reservation(&self, details: &ReservationDetails) -> Result<Reservation> {
        self.behaviour()?.can_create_reservation()?;
        self.insert(details.clone())
    }

    async fn update_reservation(&self, id: &ReservationId, details: &ReservationDetails) -> Result<Reservation> {
        self.behaviour()?.can_update_reservation()?;
        let mut data = lock(&self.data)?;
        match data.reservations.iter_mut().find(|r| r.id() == id) {
            None => Err(not_found(id)),
            Some(stored) => {
                *stored = Reservation::new(id.clone(), details.clone());
                Ok(stored.clone())
            },
        }
    }

    async fn delete_reservation(&self, id: &ReservationId) -> Result<()> {
        self.behaviour()?.can_delete_reservation()?;
        let mut data = lock(&self.data)?;
        let count_before = data.reservations.len();
        data.reservations.retain(|r| r.id() != id);
        if data.reservations.len() == count_before {
            return Err(not_found(id));
        }
        Ok(())
    }
}
