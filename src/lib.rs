//! This crate provides a way to manage meeting room reservations stored on a REST backend.
//!
//! It provides a REST client in the [`client`] module, that can be used as a stand-alone module.
//!
//! On top of it, a [`Coordinator`] keeps the state of a reservation screen (the list, its filters, the reservation form and the delete prompt). \
//! Its state is a plain [`ViewState`](state::ViewState), whose transitions are pure functions (see [`state::reduce`]), so that any front end can render it. \
//! The reservation form is validated locally (see [`form`]) before anything is sent to the backend.
//!
//! With the `mock_backend` feature, an in-memory backend whose failures can be scripted is also available (see `memory` and `mock_behaviour`).

pub mod traits;

pub mod id;
pub mod catalog;
mod reservation;
pub use reservation::{Reservation, ReservationDetails};
pub mod status;
pub use status::ReservationStatus;
pub mod form;
pub mod filter;
mod wire;

pub mod client;
pub mod memory;
pub mod mock_behaviour;

pub mod state;
pub mod coordinator;
pub use coordinator::Coordinator;

pub mod config;
pub mod error;
pub use error::Error;
pub mod utils;
