//! Slot grid
//!
//! The operating day is a fixed grid: one-hour slots from 08:00 inclusive to
//! 23:00 exclusive, identical for every date and every court. Slots are pure
//! values derived from the clock, never persisted per court.

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::{
    Zoned,
    civil::{Date, Time, time},
};
use serde::Serialize;
use thiserror::Error;

/// First slot starts at this hour.
pub const OPENING_HOUR: i8 = 8;

/// No slot starts at or after this hour.
pub const CLOSING_HOUR: i8 = 23;

/// Number of one-hour slots in an operating day.
pub const SLOTS_PER_DAY: usize = (CLOSING_HOUR - OPENING_HOUR) as usize;

/// Errors constructing a [`Slot`] from arbitrary times.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    /// The start time is not on the hourly grid inside the operating window.
    #[error("slot must start on the hour between {OPENING_HOUR}:00 and {}:00", CLOSING_HOUR - 1)]
    OffGrid,

    /// The label does not name any slot of the daily grid.
    #[error("unrecognized slot label: {0:?}")]
    UnknownLabel(String),
}

/// A one-hour time window within the operating day.
///
/// The window is half-open: `[start, end)`. Construction is restricted to the
/// canonical grid, so every `Slot` value is a valid cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Slot {
    start: Time,
    end: Time,
}

impl Slot {
    /// The slot starting at the given time, when it lies on the grid.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::OffGrid`] when the time is not a whole operating
    /// hour.
    pub fn starting_at(start: Time) -> Result<Self, SlotError> {
        if start.minute() != 0
            || start.second() != 0
            || start.subsec_nanosecond() != 0
            || start.hour() < OPENING_HOUR
            || start.hour() >= CLOSING_HOUR
        {
            return Err(SlotError::OffGrid);
        }

        Ok(Self {
            start,
            end: time(start.hour() + 1, 0, 0, 0),
        })
    }

    /// The slot matching a display label such as `"8:00 am - 9:00 am"`.
    ///
    /// Intended for command-line input; structured callers use
    /// [`Slot::starting_at`].
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::UnknownLabel`] when no grid slot renders to the
    /// given label.
    pub fn from_label(label: &str) -> Result<Self, SlotError> {
        let wanted = label.trim().to_ascii_lowercase();

        day_slots()
            .into_iter()
            .find(|slot| slot.to_string() == wanted)
            .ok_or_else(|| SlotError::UnknownLabel(label.to_string()))
    }

    /// Inclusive start of the window.
    pub fn start(&self) -> Time {
        self.start
    }

    /// Exclusive end of the window.
    pub fn end(&self) -> Time {
        self.end
    }

    /// Whether this slot on the given date has already begun.
    ///
    /// A slot is past when the date is strictly before `now`'s date, or when
    /// the date is today and the slot start is at or before the current time.
    /// A slot already in progress counts as past.
    pub fn is_past(&self, date: Date, now: &Zoned) -> bool {
        date < now.date() || (date == now.date() && self.start <= now.time())
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} - {}",
            format_hour(self.start.hour()),
            format_hour(self.end.hour())
        )
    }
}

/// The ordered slot grid of an operating day.
pub fn day_slots() -> [Slot; SLOTS_PER_DAY] {
    std::array::from_fn(|i| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let hour = OPENING_HOUR + i as i8;

        Slot {
            start: time(hour, 0, 0, 0),
            end: time(hour + 1, 0, 0, 0),
        }
    })
}

fn format_hour(hour: i8) -> String {
    let meridiem = if hour < 12 { "am" } else { "pm" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };

    format!("{display}:00 {meridiem}")
}
