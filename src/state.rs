//! The state of the reservation screen, and its transitions
//!
//! [`reduce`] is a pure function: it takes a state and an [`Action`], and returns the next state.
//! Nothing here talks to a backend. See [`Coordinator`](crate::coordinator::Coordinator) for that.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};

use crate::catalog::{Catalog, Location, Room};
use crate::config::SUCCESS_BANNER_DELAY;
use crate::error::{Error, FieldErrors};
use crate::filter::ListFilter;
use crate::form::{FormEdit, ReservationForm};
use crate::id::ReservationId;
use crate::reservation::Reservation;

/// Where the initial load is at
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    Loading,
    Loaded,
    /// Nothing is shown in this case, not even partially loaded data
    Failed(Error),
}

/// The modal currently displayed. There can be at most one.
#[derive(Clone, Debug, PartialEq)]
pub enum Modal {
    None,
    Creating,
    Editing(ReservationId),
    ConfirmingDelete(ReservationId),
}

/// The reservation form, while it is open
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    pub form: ReservationForm,
    /// Errors shown next to their inputs
    pub field_errors: FieldErrors,
    /// The error of the last submission, shown inside the form
    pub submit_error: Option<Error>,
    pub submitting: bool,
}

impl FormState {
    fn new(form: ReservationForm) -> Self {
        Self {
            form,
            field_errors: FieldErrors::new(),
            submit_error: None,
            submitting: false,
        }
    }
}

/// A transient message
#[derive(Clone, Debug, PartialEq)]
pub struct Banner {
    pub message: String,
    pub shown_at: DateTime<Utc>,
}

/// A page-level error, titled after the operation that failed
#[derive(Clone, Debug, PartialEq)]
pub struct PageError {
    pub headline: &'static str,
    pub error: Error,
}

pub const LOAD_FAILED_HEADLINE: &str = "Could not load reservations";
pub const DELETE_FAILED_HEADLINE: &str = "Could not delete the reservation";

impl Banner {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let delay = Duration::from_std(SUCCESS_BANNER_DELAY).unwrap_or_else(|_| Duration::seconds(3));
        now - self.shown_at >= delay
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewState<Tz: TimeZone = Local> {
    pub load: LoadState,
    pub catalog: Catalog,
    pub reservations: Vec<Reservation>,
    pub filter: ListFilter,
    pub modal: Modal,
    /// `Some` whenever `modal` is `Creating` or `Editing`
    pub form: Option<FormState>,
    /// Page-level error banner, dismissible
    pub error: Option<PageError>,
    pub success: Option<Banner>,
    /// Dates and times of the form are shown in this time zone
    pub timezone: Tz,
}

impl<Tz: TimeZone> ViewState<Tz> {
    pub fn new(timezone: Tz) -> Self {
        Self {
            load: LoadState::Loading,
            catalog: Catalog::default(),
            reservations: Vec::new(),
            filter: ListFilter::default(),
            modal: Modal::None,
            form: None,
            error: None,
            success: None,
            timezone,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.load == LoadState::Loaded
    }

    pub fn reservation(&self, id: &ReservationId) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id() == id)
    }

    /// The reservations that pass the current filter, in list order
    pub fn visible_reservations(&self) -> Vec<&Reservation> {
        self.filter.apply(&self.reservations)
    }

    /// The reservation the delete prompt is about
    pub fn deleting(&self) -> Option<&Reservation> {
        match &self.modal {
            Modal::ConfirmingDelete(id) => self.reservation(id),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    LoadStarted,
    Loaded{ locations: Vec<Location>, rooms: Vec<Room>, reservations: Vec<Reservation> },
    LoadFailed(Error),

    SetSearchTerm(String),
    SetLocationFilter(Option<String>),

    OpenNew,
    OpenEdit(ReservationId),
    EditForm(FormEdit),
    CloseForm,
    /// Validation failed, nothing was sent
    SubmitRejected(FieldErrors),
    SubmitStarted,
    Created(Reservation, DateTime<Utc>),
    Updated(Reservation, DateTime<Utc>),
    SubmitFailed(Error),

    RequestDelete(ReservationId),
    CancelDelete,
    Deleted(ReservationId, DateTime<Utc>),
    DeleteFailed(Error),

    DismissError,
    DismissFormError,
    /// Time has passed, transient banners may expire
    Tick(DateTime<Utc>),
}

pub fn reduce<Tz: TimeZone>(state: ViewState<Tz>, action: Action) -> ViewState<Tz> {
    let mut state = state;
    match action {
        Action::LoadStarted => {
            state.load = LoadState::Loading;
        },
        Action::Loaded{ locations, rooms, reservations } => {
            state.catalog = Catalog::new(locations, rooms);
            state.reservations = reservations;
            state.load = LoadState::Loaded;
            if state.error.as_ref().map(|e| e.headline == LOAD_FAILED_HEADLINE).unwrap_or(false) {
                state.error = None;
            }
        },
        Action::LoadFailed(err) => {
            state.catalog = Catalog::default();
            state.reservations.clear();
            state.error = Some(PageError{ headline: LOAD_FAILED_HEADLINE, error: err.clone() });
            state.load = LoadState::Failed(err);
        },

        Action::SetSearchTerm(term) => state.filter.search_term = term,
        Action::SetLocationFilter(location) => state.filter.location = location,

        Action::OpenNew => {
            state.modal = Modal::Creating;
            state.form = Some(FormState::new(ReservationForm::new()));
        },
        Action::OpenEdit(id) => {
            let form = state.reservation(&id).map(|r| ReservationForm::from_reservation(r, &state.timezone));
            match form {
                None => log::warn!("Cannot edit unknown reservation {}", id),
                Some(form) => {
                    state.modal = Modal::Editing(id);
                    state.form = Some(FormState::new(form));
                },
            }
        },
        Action::EditForm(edit) => {
            let catalog = &state.catalog;
            if let Some(form_state) = state.form.as_mut() {
                form_state.form.apply(edit);
                let latest = form_state.form.validate_in(catalog);
                form_state.field_errors.retain_still_failing(&latest);
                form_state.submit_error = None;
            }
        },
        Action::CloseForm => close_form(&mut state),
        Action::SubmitRejected(errors) => {
            if let Some(form_state) = state.form.as_mut() {
                form_state.field_errors = errors;
                form_state.submitting = false;
            }
        },
        Action::SubmitStarted => {
            if let Some(form_state) = state.form.as_mut() {
                form_state.submitting = true;
                form_state.submit_error = None;
            }
        },
        Action::Created(reservation, now) => {
            state.reservations.push(reservation);
            close_form(&mut state);
            state.success = Some(Banner{ message: "Reservation created".to_string(), shown_at: now });
        },
        Action::Updated(reservation, now) => {
            let position = state.reservations.iter().position(|r| r.id() == reservation.id());
            match position {
                Some(index) => state.reservations[index] = reservation,
                None => log::warn!("Updated reservation {} is not in the list, the list is left as is", reservation.id()),
            }
            close_form(&mut state);
            state.success = Some(Banner{ message: "Reservation updated".to_string(), shown_at: now });
        },
        Action::SubmitFailed(err) => {
            if let Some(form_state) = state.form.as_mut() {
                form_state.submitting = false;
                if let Error::Validation(fields) = &err {
                    form_state.field_errors = fields.clone();
                }
                form_state.submit_error = Some(err);
            }
        },

        Action::RequestDelete(id) => {
            if state.reservation(&id).is_some() {
                state.form = None;
                state.modal = Modal::ConfirmingDelete(id);
            } else {
                log::warn!("Cannot delete unknown reservation {}", id);
            }
        },
        Action::CancelDelete => {
            if let Modal::ConfirmingDelete(_) = state.modal {
                state.modal = Modal::None;
            }
        },
        Action::Deleted(id, now) => {
            state.reservations.retain(|r| r.id() != &id);
            if state.modal == Modal::ConfirmingDelete(id) {
                state.modal = Modal::None;
            }
            state.success = Some(Banner{ message: "Reservation deleted".to_string(), shown_at: now });
        },
        Action::DeleteFailed(err) => {
            if let Modal::ConfirmingDelete(_) = state.modal {
                state.modal = Modal::None;
            }
            state.error = Some(PageError{ headline: DELETE_FAILED_HEADLINE, error: err });
        },

        Action::DismissError => state.error = None,
        Action::DismissFormError => {
            if let Some(form_state) = state.form.as_mut() {
                form_state.submit_error = None;
            }
        },
        Action::Tick(now) => {
            if state.success.as_ref().map(|b| b.is_expired(now)).unwrap_or(false) {
                state.success = None;
            }
        },
    }
    state
}

fn close_form<Tz: TimeZone>(state: &mut ViewState<Tz>) {
    state.form = None;
    match state.modal {
        Modal::Creating | Modal::Editing(_) => state.modal = Modal::None,
        _ => (),
    }
}
