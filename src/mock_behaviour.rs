//! This module provides ways to tweak mocked backends, so that they can return errors on some tests
#![cfg(feature = "mock_backend")]

use crate::error::{Error, Result};

/// Status code used by failures, unless told otherwise
pub const DEFAULT_FAILURE_STATUS: u16 = 500;

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,
    /// The HTTP status scripted failures report. Use 409 to simulate time-slot conflicts
    pub failure_status: u16,

    pub get_locations_behaviour: (u32, u32),
    pub get_rooms_behaviour: (u32, u32),
    pub get_reservations_behaviour: (u32, u32),
    pub create_reservation_behaviour: (u32, u32),
    pub update_reservation_behaviour: (u32, u32),
    pub delete_reservation_behaviour: (u32, u32),
}

impl Default for MockBehaviour {
    fn default() -> Self {
        Self {
            is_suspended: false,
            failure_status: DEFAULT_FAILURE_STATUS,
            get_locations_behaviour: (0, 0),
            get_rooms_behaviour: (0, 0),
            get_reservations_behaviour: (0, 0),
            create_reservation_behaviour: (0, 0),
            update_reservation_behaviour: (0, 0),
            delete_reservation_behaviour: (0, 0),
        }
    }
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All operations will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            get_locations_behaviour: (0, n_fails),
            get_rooms_behaviour: (0, n_fails),
            get_reservations_behaviour: (0, n_fails),
            create_reservation_behaviour: (0, n_fails),
            update_reservation_behaviour: (0, n_fails),
            delete_reservation_behaviour: (0, n_fails),
            ..Self::default()
        }
    }

    /// Scripted failures will report `status`
    pub fn with_failure_status(mut self, status: u16) -> Self {
        self.failure_status = status;
        self
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_get_locations(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_locations_behaviour, "get_locations", self.failure_status)
    }
    pub fn can_get_rooms(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_rooms_behaviour, "get_rooms", self.failure_status)
    }
    pub fn can_get_reservations(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_reservations_behaviour, "get_reservations", self.failure_status)
    }
    pub fn can_create_reservation(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_reservation_behaviour, "create_reservation", self.failure_status)
    }
    pub fn can_update_reservation(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.update_reservation_behaviour, "update_reservation", self.failure_status)
    }
    pub fn can_delete_reservation(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_reservation_behaviour, "delete_reservation", self.failure_status)
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str, failure_status: u16) -> Result<()> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else {
        if remaining_failures > 0 {
            value.1 = value.1 - 1;
            log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
            let body = format!(r#"{{"detail": "Mocked behaviour requires this {} to fail this time. ({:?})"}}"#, descr, value);
            Err(Error::from_response(failure_status, None, &body))
        } else {
            log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        assert!(ok.can_get_reservations().is_ok());
        assert!(ok.can_get_reservations().is_ok());
        assert!(ok.can_get_reservations().is_ok());
        assert!(ok.can_create_reservation().is_ok());

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_get_reservations().is_err());
        assert!(now.can_create_reservation().is_err());
        assert!(now.can_create_reservation().is_err());
        assert!(now.can_get_reservations().is_err());
        assert!(now.can_get_reservations().is_ok());
        assert!(now.can_get_reservations().is_ok());
        assert!(now.can_create_reservation().is_ok());

        let mut custom = MockBehaviour{
            get_rooms_behaviour: (0,1),
            create_reservation_behaviour: (1,3),
            ..MockBehaviour::default()
        };
        assert!(custom.can_get_rooms().is_err());
        assert!(custom.can_get_rooms().is_ok());
        assert!(custom.can_get_rooms().is_ok());
        assert!(custom.can_create_reservation().is_ok());
        assert!(custom.can_create_reservation().is_err());
        assert!(custom.can_create_reservation().is_err());
        assert!(custom.can_create_reservation().is_err());
        assert!(custom.can_create_reservation().is_ok());

        let mut suspended = MockBehaviour::fail_now(1);
        suspended.suspend();
        assert!(suspended.can_delete_reservation().is_ok());
        suspended.resume();
        assert!(suspended.can_delete_reservation().is_err());
    }

    #[test]
    fn failures_report_the_scripted_status() {
        let mut conflicting = MockBehaviour{
            create_reservation_behaviour: (0, 1),
            ..MockBehaviour::default()
        }.with_failure_status(409);
        let err = conflicting.can_create_reservation().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = MockBehaviour::fail_now(1).can_update_reservation().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(err.status(), Some(DEFAULT_FAILURE_STATUS));
    }
}
