//! Bookings service errors.

use courtside::draft::{DraftError, PricingError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use super::models::Cell;

#[derive(Debug, Error)]
pub enum BookingsServiceError {
    /// The draft failed local validation; persistence was never touched.
    #[error("invalid booking draft: {0}")]
    Validation(#[from] DraftError),

    /// One or more requested cells are no longer available. Nothing was
    /// persisted; the cells name exactly what the client must re-render.
    #[error("{} requested cell(s) are no longer available", conflicts.len())]
    Conflicts { conflicts: Vec<Cell> },

    /// Pricing against reference data failed (dangling equipment id, …).
    #[error("could not price the draft: {0}")]
    Pricing(#[from] PricingError),

    #[error("reservation not found")]
    NotFound,

    /// The reservation belongs to another user; no state was changed.
    #[error("reservation belongs to another user")]
    Forbidden,

    /// Only reservations whose window has fully ended can be cancelled.
    #[error("reservation is still upcoming")]
    NotCancellable,

    /// A referenced row vanished between check and write.
    #[error("related resource not found")]
    InvalidReference,

    /// Storage failure. The transaction scope guarantees no partial batch
    /// was committed.
    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for BookingsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::UniqueViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

/// Whether an insert failed on the active-cell unique index. The caller
/// translates this into [`BookingsServiceError::Conflicts`] for the cell it
/// was inserting, because the index is the authoritative double-booking
/// check.
pub(crate) fn is_unique_violation(error: &Error) -> bool {
    matches!(
        error.as_database_error().map(DatabaseError::kind),
        Some(ErrorKind::UniqueViolation)
    )
}
