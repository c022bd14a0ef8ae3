//! Courtside
//!
//! Courtside is the pure domain core of a badminton-court reservation system:
//! the fixed daily slot grid, the availability resolver that classifies every
//! (court, slot) cell of a day, and the booking draft a client accumulates
//! before committing. Nothing in this crate performs I/O; persistence lives in
//! `courtside-app`.

pub mod availability;
pub mod courts;
pub mod draft;
pub mod equipment;
pub mod ids;
pub mod slots;
