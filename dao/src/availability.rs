use std::sync::Arc;

use async_trait::async_trait;
use fitdesk_utils::DayOfWeek;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

/// A weekly recurring window during which a trainer accepts appointments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityEntity {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait AvailabilityDao {
    type Transaction: crate::Transaction;

    async fn find_by_trainer(
        &self,
        trainer_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[AvailabilityEntity]>, DaoError>;
    async fn find_by_trainer_and_day(
        &self,
        trainer_id: Uuid,
        day_of_week: DayOfWeek,
        tx: Self::Transaction,
    ) -> Result<Arc<[AvailabilityEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AvailabilityEntity>, DaoError>;
    async fn create(
        &self,
        entity: &AvailabilityEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &AvailabilityEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
