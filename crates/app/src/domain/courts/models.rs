//! Court Models

pub use courtside::courts::{Court, CourtId, CourtStatus};

/// New Court Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourt {
    pub name: String,
    /// Price of one slot, in minor units.
    pub hourly_price: u64,
    pub status: CourtStatus,
}
