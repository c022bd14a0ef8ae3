//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        bookings::{BookingsService, PgBookingsService},
        courts::{CourtsService, PgCourtsService},
        equipment::{EquipmentService, PgEquipmentService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub courts: Arc<dyn CourtsService>,
    pub equipment: Arc<dyn EquipmentService>,
    pub bookings: Arc<dyn BookingsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or applying
    /// pending migrations fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .map_err(AppInitError::Migrations)?;

        let db = Db::new(pool);

        Ok(Self {
            courts: Arc::new(PgCourtsService::new(db.clone())),
            equipment: Arc::new(PgEquipmentService::new(db.clone())),
            bookings: Arc::new(PgBookingsService::new(db)),
        })
    }
}
