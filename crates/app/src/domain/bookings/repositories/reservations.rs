//! Reservations Repository

use courtside::availability::{ActiveReservation, Cell, ReservationWindow};
use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Time as SqlxTime, Timestamp as SqlxTimestamp};
use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};
use uuid::Uuid;

use crate::domain::bookings::models::{
    CourtId, ReservationId, ReservationRecord, ReservationStatus, UserId,
};

const ACTIVE_FOR_DAY_SQL: &str = include_str!("../sql/active_for_day.sql");
const INSERT_RESERVATION_SQL: &str = include_str!("../sql/insert_reservation.sql");
const GET_RESERVATION_SQL: &str = include_str!("../sql/get_reservation.sql");
const CANCEL_RESERVATION_SQL: &str = include_str!("../sql/cancel_reservation.sql");
const CONFIRM_RESERVATION_SQL: &str = include_str!("../sql/confirm_reservation.sql");
const HISTORY_BY_USER_SQL: &str = include_str!("../sql/history_by_user.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReservationsRepository;

impl PgReservationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// The day's active (pending or confirmed) reservations, reduced to
    /// resolver input. Cancelled rows never leave the database here.
    pub(crate) async fn active_for_day(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        day: Date,
    ) -> Result<Vec<ActiveReservation>, sqlx::Error> {
        let rows = query(ACTIVE_FOR_DAY_SQL)
            .bind(SqlxDate::from(day))
            .fetch_all(&mut **tx)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(ActiveReservation {
                    court: CourtId::from_i64(row.try_get("court_id")?),
                    window: ReservationWindow::from_times(
                        row.try_get::<SqlxTime, _>("start_at")?.to_jiff(),
                        row.try_get::<SqlxTime, _>("end_at")?.to_jiff(),
                    ),
                })
            })
            .collect()
    }

    /// Inserts one pending reservation row for a cell. A unique violation
    /// here means another transaction took the cell first.
    pub(crate) async fn insert_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        batch: Uuid,
        cell: Cell,
        day: Date,
        user: UserId,
    ) -> Result<ReservationId, sqlx::Error> {
        let id: i64 = query(INSERT_RESERVATION_SQL)
            .bind(batch)
            .bind(cell.court.into_i64())
            .bind(SqlxDate::from(day))
            .bind(SqlxTime::from(cell.slot.start()))
            .bind(SqlxTime::from(cell.slot.end()))
            .bind(user.get())
            .fetch_one(&mut **tx)
            .await?
            .try_get("id")?;

        Ok(ReservationId::from_i64(id))
    }

    pub(crate) async fn get_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: ReservationId,
    ) -> Result<ReservationRecord, sqlx::Error> {
        let row = query(GET_RESERVATION_SQL)
            .bind(reservation.into_i64())
            .fetch_one(&mut **tx)
            .await?;

        reservation_from_row(&row)
    }

    pub(crate) async fn cancel_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: ReservationId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CANCEL_RESERVATION_SQL)
            .bind(reservation.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn confirm_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: ReservationId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CONFIRM_RESERVATION_SQL)
            .bind(reservation.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn history_by_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
    ) -> Result<Vec<ReservationRecord>, sqlx::Error> {
        let rows = query(HISTORY_BY_USER_SQL)
            .bind(user.get())
            .fetch_all(&mut **tx)
            .await?;

        rows.iter().map(reservation_from_row).collect()
    }
}

fn reservation_from_row(row: &PgRow) -> Result<ReservationRecord, sqlx::Error> {
    let raw_status: &str = row.try_get("status")?;
    let status =
        ReservationStatus::from_db(raw_status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: format!("unknown reservation status: {raw_status:?}").into(),
        })?;

    Ok(ReservationRecord {
        id: ReservationId::from_i64(row.try_get("id")?),
        batch: row.try_get("batch_uuid")?,
        court: CourtId::from_i64(row.try_get("court_id")?),
        day: row.try_get::<SqlxDate, _>("day")?.to_jiff(),
        start_at: row.try_get::<SqlxTime, _>("start_at")?.to_jiff(),
        end_at: row.try_get::<SqlxTime, _>("end_at")?.to_jiff(),
        status,
        user: UserId::new(row.try_get("user_id")?),
        created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
    })
}
