//! Availability resolver
//!
//! Merges the fixed slot grid with a day's courts and active reservations into
//! one classification per (court, slot) cell. The resolver is a pure function
//! of its inputs so it can be tested exhaustively against synthetic data;
//! both the read path (board rendering) and the write path (commit-time
//! revalidation) go through it.

use jiff::{
    Zoned,
    civil::{Date, Time},
};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::{
    courts::{Court, CourtId, CourtStatus},
    draft::BookingDraft,
    slots::{Slot, day_slots},
};

/// A (court, slot) pair: the atomic unit of selection and booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub court: CourtId,
    pub slot: Slot,
}

/// The state of one cell on the board.
///
/// Variants are mutually exclusive; when several would apply, the earlier
/// variant wins (`Past` over `Maintenance` over `Reserved` over `Selected`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// The slot has already begun on the target date.
    Past,
    /// The court is out of service.
    Maintenance,
    /// An active reservation occupies the cell.
    Reserved,
    /// The cell is in the caller's own draft (display only).
    Selected,
    /// Free to book.
    Available,
}

/// The time window an active reservation occupies.
///
/// Windows decoded from trusted storage are [`ReservationWindow::Span`]s.
/// When raw time strings cannot be parsed the window is
/// [`ReservationWindow::Unparsed`], which fails closed: it occupies every
/// slot of its court rather than silently freeing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationWindow {
    /// A half-open `[start, end)` window.
    Span { start: Time, end: Time },
    /// A window whose bounds could not be understood.
    Unparsed,
}

impl ReservationWindow {
    /// A window from already-typed bounds.
    pub fn from_times(start: Time, end: Time) -> Self {
        Self::Span { start, end }
    }

    /// Parses raw time strings (`"14:00"`, `"14:00:00"`), falling back to
    /// [`ReservationWindow::Unparsed`] when either bound is malformed.
    pub fn parse(start: &str, end: &str) -> Self {
        match (start.trim().parse::<Time>(), end.trim().parse::<Time>()) {
            (Ok(start), Ok(end)) => Self::Span { start, end },
            _ => Self::Unparsed,
        }
    }

    fn occupies(self, slot: Slot) -> bool {
        match self {
            // Half-open overlap, not exact equality: a reservation window
            // that is off the grid still blocks every slot it touches.
            Self::Span { start, end } => start < slot.end() && slot.start() < end,
            Self::Unparsed => true,
        }
    }
}

/// An active (pending or confirmed) reservation, reduced to what the resolver
/// needs. Cancelled reservations must be filtered out before this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveReservation {
    pub court: CourtId,
    pub window: ReservationWindow,
}

/// A fully classified day board.
#[derive(Debug, Clone)]
pub struct Board {
    pub date: Date,
    pub courts: Vec<Court>,
    pub slots: Vec<Slot>,
    cells: FxHashMap<Cell, Classification>,
}

impl Board {
    /// The classification of a cell, when the cell is on this board.
    pub fn classification(&self, cell: Cell) -> Option<Classification> {
        self.cells.get(&cell).copied()
    }
}

/// Classifies a single cell.
///
/// Precedence, highest first: past, maintenance, reserved, selected,
/// available. The commit path passes `draft: None`; `Selected` only exists
/// for rendering an in-progress booking session.
pub fn classify(
    date: Date,
    now: &Zoned,
    court: &Court,
    slot: Slot,
    reservations: &[ActiveReservation],
    draft: Option<&BookingDraft>,
) -> Classification {
    if slot.is_past(date, now) {
        return Classification::Past;
    }

    if court.status != CourtStatus::Available {
        return Classification::Maintenance;
    }

    let cell = Cell {
        court: court.id,
        slot,
    };

    if reservations
        .iter()
        .any(|r| r.court == court.id && r.window.occupies(slot))
    {
        return Classification::Reserved;
    }

    if draft.is_some_and(|d| d.date == date && d.cells.contains(&cell)) {
        return Classification::Selected;
    }

    Classification::Available
}

/// Resolves the whole board for a date.
pub fn resolve(
    date: Date,
    now: &Zoned,
    courts: &[Court],
    reservations: &[ActiveReservation],
    draft: Option<&BookingDraft>,
) -> Board {
    let slots = day_slots();
    let mut cells =
        FxHashMap::with_capacity_and_hasher(courts.len() * slots.len(), Default::default());

    for court in courts {
        for slot in slots {
            cells.insert(
                Cell {
                    court: court.id,
                    slot,
                },
                classify(date, now, court, slot, reservations, draft),
            );
        }
    }

    Board {
        date,
        courts: courts.to_vec(),
        slots: slots.to_vec(),
        cells,
    }
}
