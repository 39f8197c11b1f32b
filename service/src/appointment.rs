use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
}
impl From<dao::appointment::AppointmentStatus> for AppointmentStatus {
    fn from(status: dao::appointment::AppointmentStatus) -> Self {
        match status {
            dao::appointment::AppointmentStatus::Pending => Self::Pending,
            dao::appointment::AppointmentStatus::Approved => Self::Approved,
            dao::appointment::AppointmentStatus::Rejected => Self::Rejected,
        }
    }
}
impl From<AppointmentStatus> for dao::appointment::AppointmentStatus {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Pending => Self::Pending,
            AppointmentStatus::Approved => Self::Approved,
            AppointmentStatus::Rejected => Self::Rejected,
        }
    }
}

/// Timestamps are trainer-local wall clock; conversion to anything else
/// happens at the system boundary only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub offering_id: Uuid,
    pub member_id: Arc<str>,
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
    pub price_cents: i64,
    pub status: AppointmentStatus,
    pub created: Option<PrimitiveDateTime>,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&dao::appointment::AppointmentEntity> for Appointment {
    fn from(appointment: &dao::appointment::AppointmentEntity) -> Self {
        Self {
            id: appointment.id,
            trainer_id: appointment.trainer_id,
            offering_id: appointment.offering_id,
            member_id: appointment.member_id.clone(),
            start: appointment.start,
            end: appointment.end,
            price_cents: appointment.price_cents,
            status: appointment.status.into(),
            created: Some(appointment.created),
            deleted: appointment.deleted,
            version: appointment.version,
        }
    }
}
impl TryFrom<&Appointment> for dao::appointment::AppointmentEntity {
    type Error = ServiceError;
    fn try_from(appointment: &Appointment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: appointment.id,
            trainer_id: appointment.trainer_id,
            offering_id: appointment.offering_id,
            member_id: appointment.member_id.clone(),
            start: appointment.start,
            end: appointment.end,
            price_cents: appointment.price_cents,
            status: appointment.status.into(),
            created: appointment.created.ok_or(ServiceError::InternalError)?,
            deleted: appointment.deleted,
            version: appointment.version,
        })
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait AppointmentService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction + 'static;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Appointment]>, ServiceError>;
    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Appointment, ServiceError>;
    async fn get_for_member(
        &self,
        member_id: &str,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Appointment]>, ServiceError>;

    /// Validate and price a proposed booking, persist it as Pending.
    /// End time and price are recomputed from the referenced offering;
    /// caller-supplied values for them are ignored.
    async fn create(
        &self,
        appointment: &Appointment,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Appointment, ServiceError>;

    /// Transition a pending appointment to Approved unless another approved
    /// appointment of the same trainer overlaps it.
    async fn approve(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Appointment, ServiceError>;

    /// Unconditionally transition to Rejected. Rejected appointments never
    /// contend for calendar space.
    async fn reject(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Appointment, ServiceError>;

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}
