//! Rental equipment
//!
//! Equipment (rackets, shuttlecocks, nets) is rented per hour alongside a
//! booking. Like courts, it is admin-owned reference data; stock is a plain
//! count with no reservation-style locking.

use serde::Serialize;

use crate::ids::TypedId;

/// Equipment id.
pub type EquipmentId = TypedId<Equipment>;

/// A rentable piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    /// Rental price per hour and unit, in minor units.
    pub hourly_price: u64,
    pub stock: u32,
}
