//! Equipment Models

pub use courtside::equipment::{Equipment, EquipmentId};

/// New Equipment Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEquipment {
    pub name: String,
    /// Rental price per hour and unit, in minor units.
    pub hourly_price: u64,
    pub stock: u32,
}
