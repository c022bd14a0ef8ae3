//! Bookings service.

use async_trait::async_trait;
use courtside::availability::{self, Classification};
use courtside::draft::line_subtotal;
use jiff::{Zoned, civil::Date};
use mockall::automock;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{courts::repository::PgCourtsRepository, equipment::repository::PgEquipmentRepository},
};

use super::{
    errors::{BookingsServiceError, is_unique_violation},
    models::{
        Board, BookingDraft, BookingReceipt, Cell, ReservationId, ReservationRecord,
        ReservationStatus, UserId,
    },
    repositories::{PgAllocationsRepository, PgReservationsRepository},
};

#[derive(Debug, Clone)]
pub struct PgBookingsService {
    db: Db,
    reservations: PgReservationsRepository,
    allocations: PgAllocationsRepository,
    courts: PgCourtsRepository,
    equipment: PgEquipmentRepository,
}

impl PgBookingsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            reservations: PgReservationsRepository::new(),
            allocations: PgAllocationsRepository::new(),
            courts: PgCourtsRepository::new(),
            equipment: PgEquipmentRepository::new(),
        }
    }
}

#[async_trait]
impl BookingsService for PgBookingsService {
    async fn board(&self, date: Date, now: Zoned) -> Result<Board, BookingsServiceError> {
        let mut tx = self.db.begin().await?;

        let courts = self.courts.list_courts(&mut tx).await?;
        let active = self.reservations.active_for_day(&mut tx, date).await?;

        tx.commit().await?;

        Ok(availability::resolve(date, &now, &courts, &active, None))
    }

    async fn commit(
        &self,
        draft: BookingDraft,
        user: UserId,
        now: Zoned,
    ) -> Result<BookingReceipt, BookingsServiceError> {
        draft.validate()?;

        let mut tx = self.db.begin_commit_transaction().await?;

        // Live state, never the client's snapshot.
        let courts = self.courts.list_courts(&mut tx).await?;
        let active = self.reservations.active_for_day(&mut tx, draft.date).await?;

        let conflicts: Vec<Cell> = draft
            .cells
            .iter()
            .copied()
            .filter(|cell| match courts.iter().find(|c| c.id == cell.court) {
                // A cell on a court that does not exist cannot be booked.
                None => true,
                Some(court) => {
                    availability::classify(draft.date, &now, court, cell.slot, &active, None)
                        != Classification::Available
                }
            })
            .collect();

        if !conflicts.is_empty() {
            tracing::debug!(
                user = %user,
                date = %draft.date,
                cells = conflicts.len(),
                "booking rejected by availability pre-check"
            );
            return Err(BookingsServiceError::Conflicts { conflicts });
        }

        let equipment = self.equipment.list_equipment(&mut tx).await?;
        let total = draft.total(&courts, &equipment)?;

        let batch = Uuid::now_v7();
        let mut reservations = Vec::with_capacity(draft.cells.len());

        for cell in &draft.cells {
            match self
                .reservations
                .insert_reservation(&mut tx, batch, *cell, draft.date, user)
                .await
            {
                Ok(id) => reservations.push(id),
                // The partial unique index is the authoritative check: a
                // violation means a concurrent commit won this cell after
                // our pre-check. Dropping the transaction rolls back every
                // row of the batch.
                Err(error) if is_unique_violation(&error) => {
                    return Err(BookingsServiceError::Conflicts {
                        conflicts: vec![*cell],
                    });
                }
                Err(error) => return Err(error.into()),
            }
        }

        for line in &draft.equipment {
            let subtotal = line_subtotal(line, &equipment)?;

            self.allocations
                .insert_allocation(&mut tx, batch, line, subtotal)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            %batch,
            user = %user,
            date = %draft.date,
            cells = reservations.len(),
            total,
            "booking committed"
        );

        Ok(BookingReceipt {
            batch,
            reservations,
            total,
        })
    }

    async fn cancel(
        &self,
        reservation: ReservationId,
        user: UserId,
        now: Zoned,
    ) -> Result<(), BookingsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.reservations.get_reservation(&mut tx, reservation).await?;

        if record.user != user {
            return Err(BookingsServiceError::Forbidden);
        }

        if record.status == ReservationStatus::Cancelled {
            return Err(BookingsServiceError::NotFound);
        }

        if !record.has_ended(&now) {
            return Err(BookingsServiceError::NotCancellable);
        }

        let rows_affected = self
            .reservations
            .cancel_reservation(&mut tx, reservation)
            .await?;

        if rows_affected == 0 {
            return Err(BookingsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn confirm(&self, reservation: ReservationId) -> Result<(), BookingsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .reservations
            .confirm_reservation(&mut tx, reservation)
            .await?;

        if rows_affected == 0 {
            return Err(BookingsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn history(&self, user: UserId) -> Result<Vec<ReservationRecord>, BookingsServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.reservations.history_by_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(records)
    }
}

#[automock]
#[async_trait]
pub trait BookingsService: Send + Sync {
    /// The fully classified board for a date: every (court, slot) cell with
    /// its availability classification.
    async fn board(&self, date: Date, now: Zoned) -> Result<Board, BookingsServiceError>;

    /// Atomically converts a draft into pending reservation rows plus
    /// equipment allocations. Either every requested cell commits or none
    /// does; conflicting cells are reported exactly.
    async fn commit(
        &self,
        draft: BookingDraft,
        user: UserId,
        now: Zoned,
    ) -> Result<BookingReceipt, BookingsServiceError>;

    /// Cancels a reservation from the owner's history. Restricted to the
    /// owning user and to windows that have fully ended.
    async fn cancel(
        &self,
        reservation: ReservationId,
        user: UserId,
        now: Zoned,
    ) -> Result<(), BookingsServiceError>;

    /// Marks a pending reservation confirmed; driven by the external
    /// payment collaborator.
    async fn confirm(&self, reservation: ReservationId) -> Result<(), BookingsServiceError>;

    /// The user's reservations, newest first, all statuses.
    async fn history(&self, user: UserId) -> Result<Vec<ReservationRecord>, BookingsServiceError>;
}

#[cfg(test)]
mod tests {
    use courtside::{
        courts::CourtStatus,
        draft::EquipmentLine,
        slots::Slot,
    };
    use jiff::civil::{Time, date, time};
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    /// Fixed clock for deterministic tests: the evening before `target_day`.
    fn clock() -> Zoned {
        zoned_at(date(2026, 6, 1), time(10, 0, 0, 0))
    }

    fn target_day() -> Date {
        date(2026, 6, 2)
    }

    fn zoned_at(day: Date, at: Time) -> Zoned {
        day.to_datetime(at)
            .to_zoned(jiff::tz::TimeZone::UTC)
            .expect("fixed test clock should convert")
    }

    fn cell_at(court: courtside::courts::CourtId, hour: i8) -> Cell {
        Cell {
            court,
            slot: Slot::starting_at(time(hour, 0, 0, 0)).expect("test slot should be on the grid"),
        }
    }

    fn draft_of(cells: Vec<Cell>) -> BookingDraft {
        BookingDraft {
            date: target_day(),
            cells,
            equipment: vec![],
        }
    }

    #[tokio::test]
    async fn empty_day_board_is_available() {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;

        let board = ctx
            .bookings
            .board(target_day(), clock())
            .await
            .expect("board should resolve");

        for slot in board.slots.clone() {
            assert_eq!(
                board.classification(Cell {
                    court: court.id,
                    slot
                }),
                Some(Classification::Available)
            );
        }
    }

    #[tokio::test]
    async fn single_cell_commit_produces_one_pending_row() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;
        let user = UserId::new(1);

        let receipt = ctx
            .bookings
            .commit(draft_of(vec![cell_at(court.id, 8)]), user, clock())
            .await?;

        assert_eq!(receipt.reservations.len(), 1);
        assert_eq!(receipt.total, 25_000);

        let history = ctx.bookings.history(user).await?;

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, ReservationStatus::Pending);
        assert_eq!(history[0].court, court.id);
        assert_eq!(history[0].start_at, time(8, 0, 0, 0));

        let board = ctx.bookings.board(target_day(), clock()).await?;

        assert_eq!(
            board.classification(cell_at(court.id, 8)),
            Some(Classification::Reserved)
        );

        Ok(())
    }

    #[tokio::test]
    async fn second_commit_of_same_cell_names_the_conflict() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;
        let cell = cell_at(court.id, 8);

        ctx.bookings
            .commit(draft_of(vec![cell]), UserId::new(1), clock())
            .await?;

        let result = ctx
            .bookings
            .commit(draft_of(vec![cell]), UserId::new(2), clock())
            .await;

        match result {
            Err(BookingsServiceError::Conflicts { conflicts }) => {
                assert_eq!(conflicts, vec![cell]);
            }
            other => panic!("expected Conflicts, got {other:?}"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_commits_of_same_cell_allow_exactly_one() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;
        let cell = cell_at(court.id, 8);

        let first = ctx.bookings.clone();
        let second = ctx.bookings.clone();

        let (a, b) = tokio::join!(
            first.commit(draft_of(vec![cell]), UserId::new(1), clock()),
            second.commit(draft_of(vec![cell]), UserId::new(2), clock()),
        );

        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();

        assert_eq!(
            successes, 1,
            "exactly one concurrent commit may win: {a:?} / {b:?}"
        );
        assert_eq!(ctx.count_reservations_for_day(target_day()).await, 1);

        Ok(())
    }

    #[tokio::test]
    async fn maintenance_court_is_never_bookable() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx
            .create_court_with_status("Court 2", 25_000, CourtStatus::Maintenance)
            .await;

        let board = ctx.bookings.board(target_day(), clock()).await?;

        for slot in board.slots.clone() {
            assert_eq!(
                board.classification(Cell {
                    court: court.id,
                    slot
                }),
                Some(Classification::Maintenance)
            );
        }

        let result = ctx
            .bookings
            .commit(draft_of(vec![cell_at(court.id, 8)]), UserId::new(1), clock())
            .await;

        assert!(
            matches!(result, Err(BookingsServiceError::Conflicts { .. })),
            "expected Conflicts for maintenance court, got {result:?}"
        );
        assert_eq!(ctx.count_reservations_for_day(target_day()).await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn past_slots_are_rejected_at_commit() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;

        // Today at 14:30: the 2 pm slot has begun, the 3 pm slot has not.
        let today = target_day();
        let now = zoned_at(today, time(14, 30, 0, 0));

        let past = BookingDraft {
            date: today,
            cells: vec![cell_at(court.id, 14)],
            equipment: vec![],
        };

        let result = ctx.bookings.commit(past, UserId::new(1), now.clone()).await;

        assert!(
            matches!(result, Err(BookingsServiceError::Conflicts { .. })),
            "expected Conflicts for past slot, got {result:?}"
        );

        let upcoming = BookingDraft {
            date: today,
            cells: vec![cell_at(court.id, 15)],
            equipment: vec![],
        };

        ctx.bookings.commit(upcoming, UserId::new(1), now).await?;

        Ok(())
    }

    #[tokio::test]
    async fn failed_batch_writes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;
        let taken = cell_at(court.id, 9);

        ctx.bookings
            .commit(draft_of(vec![taken]), UserId::new(1), clock())
            .await?;

        let result = ctx
            .bookings
            .commit(
                draft_of(vec![cell_at(court.id, 8), taken, cell_at(court.id, 10)]),
                UserId::new(2),
                clock(),
            )
            .await;

        assert!(
            matches!(result, Err(BookingsServiceError::Conflicts { .. })),
            "expected Conflicts, got {result:?}"
        );

        // Only the first user's row exists; the rejected batch left no trace.
        assert_eq!(ctx.count_reservations_for_day(target_day()).await, 1);

        Ok(())
    }

    #[tokio::test]
    async fn empty_draft_fails_validation_before_storage() {
        let ctx = TestContext::new().await;

        let result = ctx
            .bookings
            .commit(draft_of(vec![]), UserId::new(1), clock())
            .await;

        assert!(
            matches!(result, Err(BookingsServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );
    }

    #[tokio::test]
    async fn equipment_lines_are_priced_and_persisted() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;
        let racket = ctx.create_equipment("Racket", 1_500, 12).await;

        let draft = BookingDraft {
            date: target_day(),
            cells: vec![cell_at(court.id, 8)],
            equipment: vec![EquipmentLine {
                equipment: racket.id,
                hours: 2,
                quantity: 3,
            }],
        };

        let receipt = ctx.bookings.commit(draft, UserId::new(1), clock()).await?;

        // 25_000 + 1_500 * 2 * 3
        assert_eq!(receipt.total, 34_000);
        assert_eq!(
            ctx.allocation_subtotals_for_batch(receipt.batch).await,
            vec![9_000]
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_equipment_rejects_the_whole_batch() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;

        let draft = BookingDraft {
            date: target_day(),
            cells: vec![cell_at(court.id, 8)],
            equipment: vec![EquipmentLine {
                equipment: courtside::equipment::EquipmentId::from_i64(999),
                hours: 1,
                quantity: 1,
            }],
        };

        let result = ctx.bookings.commit(draft, UserId::new(1), clock()).await;

        assert!(
            matches!(result, Err(BookingsServiceError::Pricing(_))),
            "expected Pricing, got {result:?}"
        );
        assert_eq!(ctx.count_reservations_for_day(target_day()).await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn cancel_by_non_owner_is_forbidden_and_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;
        let owner = UserId::new(1);

        let receipt = ctx
            .bookings
            .commit(draft_of(vec![cell_at(court.id, 8)]), owner, clock())
            .await?;

        let result = ctx
            .bookings
            .cancel(receipt.reservations[0], UserId::new(2), clock())
            .await;

        assert!(
            matches!(result, Err(BookingsServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        let history = ctx.bookings.history(owner).await?;
        assert_eq!(history[0].status, ReservationStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn upcoming_reservation_cannot_be_cancelled() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;
        let owner = UserId::new(1);

        let receipt = ctx
            .bookings
            .commit(draft_of(vec![cell_at(court.id, 8)]), owner, clock())
            .await?;

        let result = ctx
            .bookings
            .cancel(receipt.reservations[0], owner, clock())
            .await;

        assert!(
            matches!(result, Err(BookingsServiceError::NotCancellable)),
            "expected NotCancellable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn owner_can_cancel_ended_reservation() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;
        let owner = UserId::new(1);

        // A reservation whose window ended yesterday, written directly.
        let yesterday = date(2026, 5, 31);
        let id = ctx
            .insert_reservation_raw(court.id, yesterday, 8, "confirmed", owner)
            .await;

        ctx.bookings.cancel(id, owner, clock()).await?;

        let history = ctx.bookings.history(owner).await?;
        assert_eq!(history[0].status, ReservationStatus::Cancelled);

        // Cancelled is terminal.
        let again = ctx.bookings.cancel(id, owner, clock()).await;
        assert!(
            matches!(again, Err(BookingsServiceError::NotFound)),
            "expected NotFound, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cancelled_cell_can_be_rebooked() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;

        ctx.insert_reservation_raw(court.id, target_day(), 8, "cancelled", UserId::new(1))
            .await;

        // The partial unique index ignores cancelled rows, so the same cell
        // books again.
        ctx.bookings
            .commit(draft_of(vec![cell_at(court.id, 8)]), UserId::new(2), clock())
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn confirm_is_pending_only() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;
        let owner = UserId::new(1);

        let receipt = ctx
            .bookings
            .commit(draft_of(vec![cell_at(court.id, 8)]), owner, clock())
            .await?;

        ctx.bookings.confirm(receipt.reservations[0]).await?;

        let history = ctx.bookings.history(owner).await?;
        assert_eq!(history[0].status, ReservationStatus::Confirmed);

        let again = ctx.bookings.confirm(receipt.reservations[0]).await;
        assert!(
            matches!(again, Err(BookingsServiceError::NotFound)),
            "expected NotFound on double confirm, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn history_is_per_user_and_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let court = ctx.create_court("Court 1", 25_000).await;
        let user = UserId::new(1);

        ctx.insert_reservation_raw(court.id, date(2026, 5, 30), 8, "confirmed", user)
            .await;
        ctx.insert_reservation_raw(court.id, date(2026, 5, 31), 9, "confirmed", user)
            .await;
        ctx.insert_reservation_raw(court.id, date(2026, 5, 31), 10, "confirmed", UserId::new(2))
            .await;

        let history = ctx.bookings.history(user).await?;

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].day, date(2026, 5, 31));
        assert_eq!(history[1].day, date(2026, 5, 30));
        assert!(history.iter().all(|r| r.user == user));

        Ok(())
    }
}
