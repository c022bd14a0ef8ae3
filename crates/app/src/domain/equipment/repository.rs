//! Equipment Repository

use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};

use crate::domain::rows::{amount_to_db, try_get_amount};

use super::models::{Equipment, EquipmentId, NewEquipment};

const LIST_EQUIPMENT_SQL: &str = include_str!("sql/list_equipment.sql");
const CREATE_EQUIPMENT_SQL: &str = include_str!("sql/create_equipment.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgEquipmentRepository;

impl PgEquipmentRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_equipment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Equipment>, sqlx::Error> {
        query(LIST_EQUIPMENT_SQL)
            .fetch_all(&mut **tx)
            .await?
            .iter()
            .map(equipment_from_row)
            .collect()
    }

    pub(crate) async fn create_equipment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        equipment: &NewEquipment,
    ) -> Result<Equipment, sqlx::Error> {
        let row = query(CREATE_EQUIPMENT_SQL)
            .bind(&equipment.name)
            .bind(amount_to_db(equipment.hourly_price, "hourly_price")?)
            .bind(i32::try_from(equipment.stock).map_err(|e| sqlx::Error::ColumnDecode {
                index: "stock".to_string(),
                source: Box::new(e),
            })?)
            .fetch_one(&mut **tx)
            .await?;

        equipment_from_row(&row)
    }
}

fn equipment_from_row(row: &PgRow) -> Result<Equipment, sqlx::Error> {
    let stock_i32: i32 = row.try_get("stock")?;

    Ok(Equipment {
        id: EquipmentId::from_i64(row.try_get("id")?),
        name: row.try_get("name")?,
        hourly_price: try_get_amount(row, "hourly_price")?,
        stock: u32::try_from(stock_i32).map_err(|e| sqlx::Error::ColumnDecode {
            index: "stock".to_string(),
            source: Box::new(e),
        })?,
    })
}
