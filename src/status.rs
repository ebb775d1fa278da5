//! The status of a reservation, derived from the current time

use std::fmt::{Display, Error, Formatter};

use chrono::{DateTime, Duration, Utc};

use crate::config::STARTING_SOON_WINDOW;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Starts in an hour or more
    Scheduled,
    /// Starts in less than an hour
    StartingSoon,
    InProgress,
    Completed,
}

impl ReservationStatus {
    /// Derive the status of a reservation spanning `[start, end]` at `now`
    pub fn at(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if now > end {
            return ReservationStatus::Completed;
        }
        if start <= now && now <= end {
            return ReservationStatus::InProgress;
        }

        let time_until_start = start - now;
        let window = Duration::from_std(STARTING_SOON_WINDOW).unwrap_or_else(|_| Duration::hours(1));
        if time_until_start > Duration::zero() && time_until_start < window {
            ReservationStatus::StartingSoon
        } else {
            ReservationStatus::Scheduled
        }
    }
}

impl Display for ReservationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            ReservationStatus::Scheduled => write!(f, "Scheduled"),
            ReservationStatus::StartingSoon => write!(f, "Starting Soon"),
            ReservationStatus::InProgress => write!(f, "In Progress"),
            ReservationStatus::Completed => write!(f, "Completed"),
        }
    }
}
