//! Equipment service.

use async_trait::async_trait;
use mockall::automock;

use crate::database::Db;

use super::{
    errors::EquipmentServiceError,
    models::{Equipment, NewEquipment},
    repository::PgEquipmentRepository,
};

#[derive(Debug, Clone)]
pub struct PgEquipmentService {
    db: Db,
    repository: PgEquipmentRepository,
}

impl PgEquipmentService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgEquipmentRepository::new(),
        }
    }
}

#[async_trait]
impl EquipmentService for PgEquipmentService {
    async fn list_equipment(&self) -> Result<Vec<Equipment>, EquipmentServiceError> {
        let mut tx = self.db.begin().await?;

        let equipment = self.repository.list_equipment(&mut tx).await?;

        tx.commit().await?;

        Ok(equipment)
    }

    async fn create_equipment(
        &self,
        equipment: NewEquipment,
    ) -> Result<Equipment, EquipmentServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_equipment(&mut tx, &equipment)
            .await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait EquipmentService: Send + Sync {
    /// All rentable equipment, in id order.
    async fn list_equipment(&self) -> Result<Vec<Equipment>, EquipmentServiceError>;

    /// Registers a new piece of equipment.
    async fn create_equipment(
        &self,
        equipment: NewEquipment,
    ) -> Result<Equipment, EquipmentServiceError>;
}
