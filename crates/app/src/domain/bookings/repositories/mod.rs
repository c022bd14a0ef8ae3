//! Booking repositories

mod allocations;
mod reservations;

pub(crate) use allocations::PgAllocationsRepository;
pub(crate) use reservations::PgReservationsRepository;
