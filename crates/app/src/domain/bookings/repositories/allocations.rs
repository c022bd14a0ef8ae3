//! Equipment Allocations Repository

use sqlx::{Postgres, Transaction, query};
use uuid::Uuid;

use crate::domain::{bookings::models::EquipmentLine, rows::amount_to_db};

const INSERT_ALLOCATION_SQL: &str = include_str!("../sql/insert_allocation.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAllocationsRepository;

impl PgAllocationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Attaches one priced rental line to a commit batch. No stock is
    /// decremented or locked; equipment overselling is not guarded here.
    pub(crate) async fn insert_allocation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        batch: Uuid,
        line: &EquipmentLine,
        subtotal: u64,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_ALLOCATION_SQL)
            .bind(batch)
            .bind(line.equipment.into_i64())
            .bind(i32::from(line.hours))
            .bind(i32::from(line.quantity))
            .bind(amount_to_db(subtotal, "subtotal")?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
