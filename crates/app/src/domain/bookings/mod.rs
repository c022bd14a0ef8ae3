//! Bookings
//!
//! The availability read path and the atomic booking commit. The
//! no-double-booking invariant is owned by the storage layer (a partial
//! unique index over active reservations); the resolver pre-check only
//! exists to report conflicts early.

pub mod errors;
pub mod models;
pub(crate) mod repositories;
pub mod service;

pub use errors::BookingsServiceError;
pub use service::*;
