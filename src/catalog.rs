//! Locations and rooms, as listed by the backend

use serde::{Deserialize, Serialize};

use crate::id::{LocationId, RoomId};

/// A physical site containing rooms
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
}

/// A bookable space, that belongs to exactly one [`Location`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub location_id: LocationId,
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl Room {
    /// The text shown in a room picker
    pub fn label(&self) -> String {
        match self.capacity {
            Some(capacity) => format!("{} - Capacity: {}", self.name, capacity),
            None => self.name.clone(),
        }
    }
}

/// Every location and room known to the backend
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    locations: Vec<Location>,
    rooms: Vec<Room>,
}

impl Catalog {
    pub fn new(locations: Vec<Location>, rooms: Vec<Room>) -> Self {
        Self { locations, rooms }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Reservations refer to their location by name
    pub fn location_named(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.name == name)
    }

    /// The rooms of the location called `location_name`, in backend order.
    /// This is empty for unknown locations.
    pub fn rooms_at(&self, location_name: &str) -> Vec<&Room> {
        match self.location_named(location_name) {
            None => Vec::new(),
            Some(location) => self.rooms.iter()
                .filter(|r| r.location_id == location.id)
                .collect(),
        }
    }

    /// Whether `room_name` is one of the rooms of `location_name`
    pub fn room_belongs_to(&self, location_name: &str, room_name: &str) -> bool {
        self.rooms_at(location_name)
            .iter()
            .any(|r| r.name == room_name)
    }
}
