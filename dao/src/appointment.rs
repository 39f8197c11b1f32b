use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
}

impl AppointmentStatus {
    pub fn to_number(&self) -> u8 {
        match self {
            AppointmentStatus::Pending => 0,
            AppointmentStatus::Approved => 1,
            AppointmentStatus::Rejected => 2,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            0 => Some(AppointmentStatus::Pending),
            1 => Some(AppointmentStatus::Approved),
            2 => Some(AppointmentStatus::Rejected),
            _ => None,
        }
    }
}

/// All appointment timestamps are trainer-local wall clock, stored without
/// an offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppointmentEntity {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub offering_id: Uuid,
    pub member_id: Arc<str>,
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
    pub price_cents: i64,
    pub status: AppointmentStatus,
    pub created: PrimitiveDateTime,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait AppointmentDao {
    type Transaction: crate::Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[AppointmentEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AppointmentEntity>, DaoError>;
    /// All non-deleted appointments of the trainer whose interval intersects
    /// `[from, until)`, regardless of status.
    async fn find_by_trainer_in_range(
        &self,
        trainer_id: Uuid,
        from: PrimitiveDateTime,
        until: PrimitiveDateTime,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError>;
    async fn find_by_member(
        &self,
        member_id: &str,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &AppointmentEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &AppointmentEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
