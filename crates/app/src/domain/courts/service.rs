//! Courts service.

use async_trait::async_trait;
use mockall::automock;

use crate::database::Db;

use super::{
    errors::CourtsServiceError,
    models::{Court, CourtId, CourtStatus, NewCourt},
    repository::PgCourtsRepository,
};

#[derive(Debug, Clone)]
pub struct PgCourtsService {
    db: Db,
    repository: PgCourtsRepository,
}

impl PgCourtsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCourtsRepository::new(),
        }
    }
}

#[async_trait]
impl CourtsService for PgCourtsService {
    async fn list_courts(&self) -> Result<Vec<Court>, CourtsServiceError> {
        let mut tx = self.db.begin().await?;

        let courts = self.repository.list_courts(&mut tx).await?;

        tx.commit().await?;

        Ok(courts)
    }

    async fn create_court(&self, court: NewCourt) -> Result<Court, CourtsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_court(&mut tx, &court).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn set_court_status(
        &self,
        court: CourtId,
        status: CourtStatus,
    ) -> Result<(), CourtsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .set_court_status(&mut tx, court, status)
            .await?;

        if rows_affected == 0 {
            return Err(CourtsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CourtsService: Send + Sync {
    /// All courts, in id order.
    async fn list_courts(&self) -> Result<Vec<Court>, CourtsServiceError>;

    /// Registers a new court.
    async fn create_court(&self, court: NewCourt) -> Result<Court, CourtsServiceError>;

    /// Moves a court between `available` and `maintenance`.
    async fn set_court_status(
        &self,
        court: CourtId,
        status: CourtStatus,
    ) -> Result<(), CourtsServiceError>;
}

#[cfg(test)]
mod tests {
    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn created_court_is_listed() {
        let ctx = TestContext::new().await;

        let court = ctx
            .courts
            .create_court(NewCourt {
                name: "Court 1".to_string(),
                hourly_price: 25_000,
                status: CourtStatus::Available,
            })
            .await
            .expect("create_court should succeed");

        assert_eq!(court.name, "Court 1");
        assert_eq!(court.hourly_price, 25_000);
        assert_eq!(court.status, CourtStatus::Available);

        let listed = ctx
            .courts
            .list_courts()
            .await
            .expect("list_courts should succeed");

        assert_eq!(listed, vec![court]);
    }

    #[tokio::test]
    async fn status_change_round_trips() {
        let ctx = TestContext::new().await;

        let court = ctx.create_court("Court 1", 25_000).await;

        ctx.courts
            .set_court_status(court.id, CourtStatus::Maintenance)
            .await
            .expect("set_court_status should succeed");

        let listed = ctx
            .courts
            .list_courts()
            .await
            .expect("list_courts should succeed");

        assert_eq!(listed[0].status, CourtStatus::Maintenance);
    }

    #[tokio::test]
    async fn status_change_for_unknown_court_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .courts
            .set_court_status(CourtId::from_i64(999), CourtStatus::Maintenance)
            .await;

        assert!(
            matches!(result, Err(CourtsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
