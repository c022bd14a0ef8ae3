//! Courtside Domain Concerns

pub mod bookings;
pub mod courts;
pub mod equipment;

pub(crate) mod rows;
