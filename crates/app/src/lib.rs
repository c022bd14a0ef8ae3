//! Courtside persistence and services: PostgreSQL-backed booking, court and
//! equipment services over the pure domain in the `courtside` crate.

pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;
