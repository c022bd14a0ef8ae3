//! Courts Repository

use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};

use crate::domain::rows::{amount_to_db, try_get_amount};

use super::models::{Court, CourtId, CourtStatus, NewCourt};

const LIST_COURTS_SQL: &str = include_str!("sql/list_courts.sql");
const CREATE_COURT_SQL: &str = include_str!("sql/create_court.sql");
const SET_COURT_STATUS_SQL: &str = include_str!("sql/set_court_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCourtsRepository;

impl PgCourtsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_courts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Court>, sqlx::Error> {
        query(LIST_COURTS_SQL)
            .fetch_all(&mut **tx)
            .await?
            .iter()
            .map(court_from_row)
            .collect()
    }

    pub(crate) async fn create_court(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        court: &NewCourt,
    ) -> Result<Court, sqlx::Error> {
        let row = query(CREATE_COURT_SQL)
            .bind(&court.name)
            .bind(amount_to_db(court.hourly_price, "hourly_price")?)
            .bind(court.status.as_db())
            .fetch_one(&mut **tx)
            .await?;

        court_from_row(&row)
    }

    pub(crate) async fn set_court_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        court: CourtId,
        status: CourtStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_COURT_STATUS_SQL)
            .bind(court.into_i64())
            .bind(status.as_db())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn court_from_row(row: &PgRow) -> Result<Court, sqlx::Error> {
    Ok(Court {
        id: CourtId::from_i64(row.try_get("id")?),
        name: row.try_get("name")?,
        hourly_price: try_get_amount(row, "hourly_price")?,
        status: CourtStatus::from_db(row.try_get::<&str, _>("status")?),
    })
}
