//! Booking drafts
//!
//! A [`BookingDraft`] is the client-accumulated selection for one date: cells
//! plus equipment rental lines. It is an explicit value passed by argument —
//! never ambient session state — and is all-or-nothing: either the whole
//! draft commits or none of it does.

use jiff::civil::Date;
use serde::Serialize;
use thiserror::Error;

use crate::{
    availability::Cell,
    courts::{Court, CourtId},
    equipment::{Equipment, EquipmentId},
};

/// One equipment rental line of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EquipmentLine {
    pub equipment: EquipmentId,
    /// Rental duration in hours.
    pub hours: u8,
    pub quantity: u16,
}

/// The not-yet-committed selection for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingDraft {
    pub date: Date,
    /// Selected cells, in the order the user picked them.
    pub cells: Vec<Cell>,
    pub equipment: Vec<EquipmentLine>,
}

/// Why a draft is invalid, before persistence is ever consulted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    /// No cells were selected.
    #[error("no cells selected")]
    Empty,

    /// The same cell appears twice.
    #[error("cell selected twice: court {court}, {slot}", court = .0.court, slot = .0.slot)]
    DuplicateCell(Cell),

    /// An equipment line rents for zero hours.
    #[error("equipment {0} rented for zero hours")]
    ZeroHours(EquipmentId),

    /// An equipment line has zero quantity.
    #[error("equipment {0} with zero quantity")]
    ZeroQuantity(EquipmentId),
}

/// Why a total could not be priced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A cell references a court that does not exist.
    #[error("unknown court: {0}")]
    UnknownCourt(CourtId),

    /// A line references equipment that does not exist.
    #[error("unknown equipment: {0}")]
    UnknownEquipment(EquipmentId),

    /// The total does not fit in 64 bits of minor units.
    #[error("total amount overflows")]
    Overflow,
}

impl BookingDraft {
    /// Checks the draft's internal consistency.
    ///
    /// # Errors
    ///
    /// Returns the first [`DraftError`] found: an empty cell list, a
    /// duplicated cell, or a degenerate equipment line.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.cells.is_empty() {
            return Err(DraftError::Empty);
        }

        for (i, cell) in self.cells.iter().enumerate() {
            if self.cells.iter().skip(i + 1).any(|other| other == cell) {
                return Err(DraftError::DuplicateCell(*cell));
            }
        }

        for line in &self.equipment {
            if line.hours == 0 {
                return Err(DraftError::ZeroHours(line.equipment));
            }
            if line.quantity == 0 {
                return Err(DraftError::ZeroQuantity(line.equipment));
            }
        }

        Ok(())
    }

    /// The draft's total price in minor units: one hourly court price per
    /// cell plus every equipment subtotal.
    ///
    /// # Errors
    ///
    /// - [`PricingError::UnknownCourt`] / [`PricingError::UnknownEquipment`]
    ///   when a referenced id is missing from the given reference data.
    /// - [`PricingError::Overflow`] when the sum exceeds `u64`.
    pub fn total(&self, courts: &[Court], equipment: &[Equipment]) -> Result<u64, PricingError> {
        let mut total: u64 = 0;

        for cell in &self.cells {
            let court = courts
                .iter()
                .find(|c| c.id == cell.court)
                .ok_or(PricingError::UnknownCourt(cell.court))?;

            total = total
                .checked_add(court.hourly_price)
                .ok_or(PricingError::Overflow)?;
        }

        for line in &self.equipment {
            total = total
                .checked_add(line_subtotal(line, equipment)?)
                .ok_or(PricingError::Overflow)?;
        }

        Ok(total)
    }
}

/// The subtotal of one rental line: `price × hours × quantity`.
///
/// # Errors
///
/// Returns [`PricingError::UnknownEquipment`] for a missing id and
/// [`PricingError::Overflow`] when the product exceeds `u64`.
pub fn line_subtotal(line: &EquipmentLine, equipment: &[Equipment]) -> Result<u64, PricingError> {
    let item = equipment
        .iter()
        .find(|e| e.id == line.equipment)
        .ok_or(PricingError::UnknownEquipment(line.equipment))?;

    item.hourly_price
        .checked_mul(u64::from(line.hours))
        .and_then(|v| v.checked_mul(u64::from(line.quantity)))
        .ok_or(PricingError::Overflow)
}
