use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use fitdesk_utils::DayOfWeek;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

/// A weekly recurring window during which a trainer accepts appointments.
/// Windows per (trainer, day) are not guaranteed disjoint; the slot
/// calculator treats each window independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&dao::availability::AvailabilityEntity> for TimeWindow {
    fn from(window: &dao::availability::AvailabilityEntity) -> Self {
        Self {
            id: window.id,
            trainer_id: window.trainer_id,
            day_of_week: window.day_of_week,
            start_time: window.start_time,
            end_time: window.end_time,
            deleted: window.deleted,
            version: window.version,
        }
    }
}
impl From<&TimeWindow> for dao::availability::AvailabilityEntity {
    fn from(window: &TimeWindow) -> Self {
        Self {
            id: window.id,
            trainer_id: window.trainer_id,
            day_of_week: window.day_of_week,
            start_time: window.start_time,
            end_time: window.end_time,
            deleted: window.deleted,
            version: window.version,
        }
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait AvailabilityService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction + 'static;

    async fn get_for_trainer(
        &self,
        trainer_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[TimeWindow]>, ServiceError>;
    async fn create(
        &self,
        window: &TimeWindow,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<TimeWindow, ServiceError>;
    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}
