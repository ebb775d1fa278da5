//! Filters of the reservation list

use crate::reservation::Reservation;

/// Which reservations are visible in the list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListFilter {
    /// Matched (case-insensitively) against rooms and responsible persons
    pub search_term: String,
    /// When set, only reservations at this location are shown
    pub location: Option<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any criterion is set
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty() || self.location_name().is_some()
    }

    fn location_name(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.is_empty())
    }

    pub fn matches(&self, reservation: &Reservation) -> bool {
        let term = self.search_term.to_lowercase();
        let matches_search = reservation.room().to_lowercase().contains(&term)
            || reservation.responsible_person().to_lowercase().contains(&term);

        let matches_location = match self.location_name() {
            None => true,
            Some(location) => reservation.location() == location,
        };

        matches_search && matches_location
    }

    /// The visible reservations, in their original order
    pub fn apply<'a>(&self, reservations: &'a [Reservation]) -> Vec<&'a Reservation> {
        reservations.iter()
            .filter(|r| self.matches(r))
            .collect()
    }
}
