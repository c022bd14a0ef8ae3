//! Booking Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::{
    Timestamp,
    civil::{Date, Time},
};
use uuid::Uuid;

use courtside::ids::TypedId;

pub use courtside::{
    availability::{Board, Cell, Classification},
    courts::CourtId,
    draft::{BookingDraft, EquipmentLine},
};

/// Reservation id.
pub type ReservationId = TypedId<ReservationRecord>;

/// The id of a booking user. Identity itself lives with the auth
/// collaborator; the booking core only records ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(i64);

impl UserId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Reservation lifecycle.
///
/// `Pending → Confirmed` on payment confirmation (external trigger);
/// `Pending | Confirmed → Cancelled` on owner-initiated history deletion.
/// Cancelled is terminal and stops occupying its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    /// The canonical stored form.
    pub fn as_db(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Decodes a stored status string; the schema constrains the column to
    /// the three known values, so anything else is a decode failure.
    pub fn from_db(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A persisted reservation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRecord {
    pub id: ReservationId,
    /// The commit batch this row was created in.
    pub batch: Uuid,
    pub court: CourtId,
    pub day: Date,
    pub start_at: Time,
    pub end_at: Time,
    pub status: ReservationStatus,
    pub user: UserId,
    pub created_at: Timestamp,
}

impl ReservationRecord {
    /// Whether the reserved window has fully ended, making the row part of
    /// booking history.
    pub fn has_ended(&self, now: &jiff::Zoned) -> bool {
        self.day < now.date() || (self.day == now.date() && self.end_at <= now.time())
    }
}

/// The outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingReceipt {
    /// Shared batch id of every row created by this commit.
    pub batch: Uuid,
    /// Newly created reservations, one per requested cell, in request order.
    pub reservations: Vec<ReservationId>,
    /// Total amount in minor units: court prices plus equipment subtotals.
    pub total: u64,
}
