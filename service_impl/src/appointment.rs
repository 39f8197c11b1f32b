use std::sync::Arc;

use async_trait::async_trait;
use fitdesk_utils::DayOfWeek;
use service::{
    appointment::{Appointment, AppointmentService, AppointmentStatus},
    catalog::CatalogService,
    clock::ClockService,
    permission::{Authentication, PermissionService, ADMIN_PRIVILEGE, MEMBER_PRIVILEGE},
    trainer::TrainerService,
    uuid_service::UuidService,
    ServiceError, ValidationFailureItem,
};
use tracing::instrument;
use uuid::Uuid;

use crate::gen_service_impl;
use crate::scheduling::intervals_overlap;
use dao::appointment::AppointmentDao;
use dao::availability::AvailabilityDao;
use dao::TransactionDao;

const APPOINTMENT_SERVICE_PROCESS: &str = "appointment-service";

gen_service_impl! {
    struct AppointmentServiceImpl: AppointmentService = AppointmentServiceDeps {
        AppointmentDao: dao::appointment::AppointmentDao<Transaction = Self::Transaction> = appointment_dao,
        AvailabilityDao: dao::availability::AvailabilityDao<Transaction = Self::Transaction> = availability_dao,
        TrainerService: TrainerService<Context = Self::Context, Transaction = Self::Transaction> = trainer_service,
        CatalogService: CatalogService<Context = Self::Context, Transaction = Self::Transaction> = catalog_service,
        PermissionService: service::permission::PermissionService<Context = Self::Context> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao
    }
}

impl<Deps: AppointmentServiceDeps> AppointmentServiceImpl<Deps> {
    /// Admin may act for anyone; a member only for themselves.
    async fn check_member_access(
        &self,
        member_id: &str,
        context: Authentication<Deps::Context>,
    ) -> Result<(), ServiceError> {
        if self
            .permission_service
            .check_permission(ADMIN_PRIVILEGE, context.clone())
            .await
            .is_ok()
        {
            return Ok(());
        }
        self.permission_service
            .check_permission(MEMBER_PRIVILEGE, context.clone())
            .await?;
        let current_user = self.permission_service.current_user_id(context).await?;
        if current_user.as_deref() != Some(member_id) {
            return Err(ServiceError::Forbidden);
        }
        Ok(())
    }
}

#[async_trait]
impl<Deps: AppointmentServiceDeps> AppointmentService for AppointmentServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Appointment]>, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let appointments: Arc<[Appointment]> = self
            .appointment_dao
            .all(tx.clone())
            .await?
            .iter()
            .map(Appointment::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(appointments)
    }

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Appointment, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let appointment = self
            .appointment_dao
            .find_by_id(id, tx.clone())
            .await?
            .as_ref()
            .map(Appointment::from)
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(appointment)
    }

    async fn get_for_member(
        &self,
        member_id: &str,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Appointment]>, ServiceError> {
        self.check_member_access(member_id, context).await?;
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let appointments: Arc<[Appointment]> = self
            .appointment_dao
            .find_by_member(member_id, tx.clone())
            .await?
            .iter()
            .map(Appointment::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(appointments)
    }

    #[instrument(skip(self, context, tx))]
    async fn create(
        &self,
        appointment: &Appointment,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Appointment, ServiceError> {
        self.check_member_access(appointment.member_id.as_ref(), context)
            .await?;

        if !appointment.id.is_nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if !appointment.version.is_nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        let mut failures = Vec::new();
        if appointment.member_id.is_empty() {
            failures.push(ValidationFailureItem::MissingField("member_id".into()));
        }
        if appointment.created.is_some() {
            failures.push(ValidationFailureItem::InvalidValue("created".into()));
        }
        if appointment.deleted.is_some() {
            failures.push(ValidationFailureItem::InvalidValue("deleted".into()));
        }
        if !failures.is_empty() {
            return Err(ServiceError::ValidationError(failures.into()));
        }

        let tx = self.transaction_dao.use_transaction(tx).await?;

        let offering = self
            .catalog_service
            .get_offering(appointment.offering_id, Authentication::Full, Some(tx.clone()))
            .await?;
        if !self
            .trainer_service
            .exists(appointment.trainer_id, Authentication::Full, Some(tx.clone()))
            .await?
        {
            return Err(ServiceError::EntityNotFound(appointment.trainer_id));
        }

        let start = appointment.start;
        // A session never crosses midnight since no window does; an end that
        // is not even representable is equally out of hours.
        let end = start
            .checked_add(time::Duration::minutes(i64::from(
                offering.duration_minutes,
            )))
            .ok_or(ServiceError::OutsideWorkingHours)?;
        if end.date() != start.date() {
            return Err(ServiceError::OutsideWorkingHours);
        }

        let windows = self
            .availability_dao
            .find_by_trainer_and_day(
                appointment.trainer_id,
                DayOfWeek::from(start.date().weekday()),
                tx.clone(),
            )
            .await?;
        let contained = windows
            .iter()
            .any(|window| window.start_time <= start.time() && window.end_time >= end.time());
        if !contained {
            return Err(ServiceError::OutsideWorkingHours);
        }

        // Pending appointments hold their slot against new bookings even
        // though they do not hide it from the free-slot listing.
        let blocked = self
            .appointment_dao
            .find_by_trainer_in_range(appointment.trainer_id, start, end, tx.clone())
            .await?
            .iter()
            .any(|existing| {
                existing.status != dao::appointment::AppointmentStatus::Rejected
                    && intervals_overlap(start, end, existing.start, existing.end)
            });
        if blocked {
            return Err(ServiceError::TimeSlotTaken);
        }

        let appointment = Appointment {
            id: self.uuid_service.new_uuid("appointment-id"),
            version: self.uuid_service.new_uuid("appointment-version"),
            end,
            price_cents: offering.price_cents,
            status: AppointmentStatus::Pending,
            created: Some(self.clock_service.date_time_now()),
            ..appointment.clone()
        };
        self.appointment_dao
            .create(
                &(&appointment).try_into()?,
                APPOINTMENT_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(appointment)
    }

    #[instrument(skip(self, context, tx))]
    async fn approve(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Appointment, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let mut entity = self
            .appointment_dao
            .find_by_id(id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(id))?;

        // Only already-approved appointments veto an approval. A losing
        // candidate stays Pending so it can be retried or rejected later.
        let conflict = self
            .appointment_dao
            .find_by_trainer_in_range(entity.trainer_id, entity.start, entity.end, tx.clone())
            .await?
            .iter()
            .any(|existing| {
                existing.id != entity.id
                    && existing.status == dao::appointment::AppointmentStatus::Approved
                    && intervals_overlap(entity.start, entity.end, existing.start, existing.end)
            });
        if conflict {
            return Err(ServiceError::TimeSlotTaken);
        }

        entity.status = dao::appointment::AppointmentStatus::Approved;
        entity.version = self.uuid_service.new_uuid("appointment-version");
        self.appointment_dao
            .update(&entity, APPOINTMENT_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok((&entity).into())
    }

    async fn reject(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Appointment, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let mut entity = self
            .appointment_dao
            .find_by_id(id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(id))?;
        entity.status = dao::appointment::AppointmentStatus::Rejected;
        entity.version = self.uuid_service.new_uuid("appointment-version");
        self.appointment_dao
            .update(&entity, APPOINTMENT_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok((&entity).into())
    }

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let mut entity = self
            .appointment_dao
            .find_by_id(id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(id))?;
        entity.deleted = Some(self.clock_service.date_time_now());
        entity.version = self.uuid_service.new_uuid("appointment-version");
        self.appointment_dao
            .update(&entity, APPOINTMENT_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}
