//! Courts
//!
//! Courts are reference data owned by the admin side; the booking core only
//! reads them. Prices are minor currency units (centavos).

use serde::{Deserialize, Serialize};

use crate::ids::TypedId;

/// Court id.
pub type CourtId = TypedId<Court>;

/// A bookable court.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Court {
    pub id: CourtId,
    pub name: String,
    /// Price of one slot, in minor units.
    pub hourly_price: u64,
    pub status: CourtStatus,
}

/// Court lifecycle status.
///
/// Persistence stores the status as free-form text; [`CourtStatus::from_db`]
/// closes that over a two-state policy where anything unrecognized is treated
/// as out of service, never as bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourtStatus {
    Available,
    Maintenance,
}

impl CourtStatus {
    /// Decodes a stored status string, defaulting to unavailable.
    ///
    /// Exactly `available` (case-insensitive, surrounding whitespace ignored)
    /// decodes to [`CourtStatus::Available`]; every other value, including
    /// the empty string and legacy values like `Unavailable`, decodes to
    /// [`CourtStatus::Maintenance`].
    pub fn from_db(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("available") {
            Self::Available
        } else {
            Self::Maintenance
        }
    }

    /// The canonical stored form.
    pub fn as_db(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Maintenance => "maintenance",
        }
    }
}
