//! Drives a [`ViewState`] by talking to a [`ReservationBackend`]
//!
//! Every user action maps to one method of [`Coordinator`]. Backend answers are turned into [`Action`]s and fed to [`reduce`],
//! so that the in-memory list is only changed after the backend confirmed a change.

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::form::FormEdit;
use crate::id::ReservationId;
use crate::reservation::Reservation;
use crate::state::{reduce, Action, Modal, ViewState};
use crate::status::ReservationStatus;
use crate::traits::{Clock, ReservationBackend, SystemClock};

pub struct Coordinator<B, Tz = Local>
where
    B: ReservationBackend,
    Tz: TimeZone,
{
    backend: B,
    clock: Box<dyn Clock + Send + Sync>,
    state: ViewState<Tz>,
}

impl<B> Coordinator<B, Local>
where
    B: ReservationBackend,
{
    /// Create a coordinator that uses the wall clock and the local time zone
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, SystemClock, Local)
    }
}

impl<B, Tz> Coordinator<B, Tz>
where
    B: ReservationBackend,
    Tz: TimeZone,
{
    /// Create a coordinator with a custom clock, and a custom time zone for the dates and times of the form
    pub fn with_clock<C>(backend: B, clock: C, timezone: Tz) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        Self {
            backend,
            clock: Box::new(clock),
            state: ViewState::new(timezone),
        }
    }

    pub fn backend(&self) -> &B { &self.backend }
    pub fn state(&self) -> &ViewState<Tz> { &self.state }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn dispatch(&mut self, action: Action) {
        let timezone = self.state.timezone.clone();
        let state = std::mem::replace(&mut self.state, ViewState::new(timezone));
        self.state = reduce(state, action);
    }

    /// Fetch locations, rooms and reservations at once.
    ///
    /// If any of them fails, the whole load fails and nothing is shown.
    pub async fn load(&mut self) -> Result<()> {
        self.dispatch(Action::LoadStarted);
        log::info!("Loading locations, rooms and reservations");

        let fetched = tokio::try_join!(
            self.backend.get_locations(),
            self.backend.get_rooms(),
            self.backend.get_reservations(),
        );
        match fetched {
            Ok((locations, rooms, reservations)) => {
                log::info!("Loaded {} locations, {} rooms and {} reservations", locations.len(), rooms.len(), reservations.len());
                self.dispatch(Action::Loaded{ locations, rooms, reservations });
                Ok(())
            },
            Err(err) => {
                log::error!("Unable to load reservations: {}", err);
                self.dispatch(Action::LoadFailed(err.clone()));
                Err(err)
            },
        }
    }

    pub fn set_search_term<S: ToString>(&mut self, term: S) {
        self.dispatch(Action::SetSearchTerm(term.to_string()));
    }

    pub fn set_location_filter(&mut self, location: Option<String>) {
        self.dispatch(Action::SetLocationFilter(location));
    }

    pub fn visible_reservations(&self) -> Vec<&Reservation> {
        self.state.visible_reservations()
    }

    /// The status of a reservation right now
    pub fn status_of(&self, reservation: &Reservation) -> ReservationStatus {
        reservation.status_at(self.now())
    }

    pub fn new_reservation(&mut self) {
        self.dispatch(Action::OpenNew);
    }

    pub fn edit(&mut self, id: &ReservationId) {
        self.dispatch(Action::OpenEdit(id.clone()));
    }

    pub fn edit_form(&mut self, edit: FormEdit) {
        self.dispatch(Action::EditForm(edit));
    }

    pub fn close_form(&mut self) {
        self.dispatch(Action::CloseForm);
    }

    pub fn dismiss_error(&mut self) {
        self.dispatch(Action::DismissError);
    }

    pub fn dismiss_form_error(&mut self) {
        self.dispatch(Action::DismissFormError);
    }

    /// Submit the open form.
    ///
    /// An invalid form is never sent. On failure, the form stays open and shows the error
    pub async fn submit(&mut self) -> Result<Reservation> {
        let form_state = self.state.form.as_ref()
            .ok_or_else(|| Error::request("no reservation form is open"))?;
        let details = match form_state.form.to_details(&self.state.catalog, &self.state.timezone) {
            Ok(details) => details,
            Err(Error::Validation(fields)) => {
                log::debug!("Reservation form is invalid: {}", fields);
                self.dispatch(Action::SubmitRejected(fields.clone()));
                return Err(Error::Validation(fields));
            },
            Err(err) => {
                self.dispatch(Action::SubmitFailed(err.clone()));
                return Err(err);
            },
        };

        self.dispatch(Action::SubmitStarted);
        let result = match self.state.modal.clone() {
            Modal::Editing(id) => self.backend.update_reservation(&id, &details).await
                .map(|r| (r, true)),
            _ => self.backend.create_reservation(&details).await
                .map(|r| (r, false)),
        };

        match result {
            Ok((reservation, updated)) => {
                let now = self.now();
                let action = if updated {
                    Action::Updated(reservation.clone(), now)
                } else {
                    Action::Created(reservation.clone(), now)
                };
                self.dispatch(action);
                Ok(reservation)
            },
            Err(err) => {
                if err.is_conflict() {
                    log::warn!("Time-slot conflict for {} at {}: {}", details.room, details.location, err.message());
                } else {
                    log::warn!("Unable to save reservation: {}", err);
                }
                self.dispatch(Action::SubmitFailed(err.clone()));
                Err(err)
            },
        }
    }

    pub fn request_delete(&mut self, id: &ReservationId) {
        self.dispatch(Action::RequestDelete(id.clone()));
    }

    pub fn cancel_delete(&mut self) {
        self.dispatch(Action::CancelDelete);
    }

    /// Delete the reservation the delete prompt is about
    pub async fn confirm_delete(&mut self) -> Result<()> {
        let id = match &self.state.modal {
            Modal::ConfirmingDelete(id) => id.clone(),
            _ => return Err(Error::request("no deletion to confirm")),
        };

        match self.backend.delete_reservation(&id).await {
            Ok(()) => {
                let now = self.now();
                self.dispatch(Action::Deleted(id, now));
                Ok(())
            },
            Err(err) => {
                log::warn!("Unable to delete reservation {}: {}", id, err);
                self.dispatch(Action::DeleteFailed(err.clone()));
                Err(err)
            },
        }
    }

    /// Let transient banners expire
    pub fn tick(&mut self) {
        let now = self.now();
        self.dispatch(Action::Tick(now));
    }
}
