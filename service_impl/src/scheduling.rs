use std::sync::Arc;

use async_trait::async_trait;
use fitdesk_utils::DayOfWeek;
use service::{
    catalog::CatalogService,
    permission::{Authentication, PermissionService, ADMIN_PRIVILEGE, MEMBER_PRIVILEGE},
    scheduling::{SchedulingService, SlotDuration},
    trainer::TrainerService,
    ServiceError, ValidationFailureItem,
};
use time::PrimitiveDateTime;
use tokio::join;
use tracing::instrument;
use uuid::Uuid;

use crate::gen_service_impl;
use dao::appointment::AppointmentDao;
use dao::availability::AvailabilityDao;
use dao::TransactionDao;

/// Half-open interval overlap: `[start_1, end_1)` intersects `[start_2, end_2)`.
/// The same formula gates booking creation and approval.
pub fn intervals_overlap(
    start_1: PrimitiveDateTime,
    end_1: PrimitiveDateTime,
    start_2: PrimitiveDateTime,
    end_2: PrimitiveDateTime,
) -> bool {
    start_1 < end_2 && end_1 > start_2
}

gen_service_impl! {
    struct SchedulingServiceImpl: SchedulingService = SchedulingServiceDeps {
        AvailabilityDao: dao::availability::AvailabilityDao<Transaction = Self::Transaction> = availability_dao,
        AppointmentDao: dao::appointment::AppointmentDao<Transaction = Self::Transaction> = appointment_dao,
        TrainerService: TrainerService<Context = Self::Context, Transaction = Self::Transaction> = trainer_service,
        CatalogService: CatalogService<Context = Self::Context, Transaction = Self::Transaction> = catalog_service,
        PermissionService: service::permission::PermissionService<Context = Self::Context> = permission_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao
    }
}

#[async_trait]
impl<Deps: SchedulingServiceDeps> SchedulingService for SchedulingServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    #[instrument(skip(self, context, tx))]
    async fn free_slots(
        &self,
        trainer_id: Uuid,
        date: time::Date,
        duration: SlotDuration,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[PrimitiveDateTime]>, ServiceError> {
        let (admin_permission, member_permission) = join!(
            self.permission_service
                .check_permission(ADMIN_PRIVILEGE, context.clone()),
            self.permission_service
                .check_permission(MEMBER_PRIVILEGE, context),
        );
        admin_permission.or(member_permission)?;

        let tx = self.transaction_dao.use_transaction(tx).await?;

        if !self
            .trainer_service
            .exists(trainer_id, Authentication::Full, Some(tx.clone()))
            .await?
        {
            return Err(ServiceError::EntityNotFound(trainer_id));
        }

        let minutes = match duration {
            SlotDuration::Minutes(minutes) => minutes,
            SlotDuration::Offering(offering_id) => {
                self.catalog_service
                    .get_offering(offering_id, Authentication::Full, Some(tx.clone()))
                    .await?
                    .duration_minutes
            }
        };
        if minutes == 0 {
            return Err(ServiceError::ValidationError(Arc::new([
                ValidationFailureItem::InvalidValue("duration_minutes".into()),
            ])));
        }
        let slot_length = time::Duration::minutes(i64::from(minutes));

        let windows = self
            .availability_dao
            .find_by_trainer_and_day(trainer_id, DayOfWeek::from(date.weekday()), tx.clone())
            .await?;

        let day_start = PrimitiveDateTime::new(date, time::Time::MIDNIGHT);
        let day_end = day_start
            .checked_add(time::Duration::DAY)
            .unwrap_or(PrimitiveDateTime::MAX);
        let approved: Vec<dao::appointment::AppointmentEntity> = self
            .appointment_dao
            .find_by_trainer_in_range(trainer_id, day_start, day_end, tx.clone())
            .await?
            .iter()
            .filter(|appointment| {
                appointment.status == dao::appointment::AppointmentStatus::Approved
            })
            .cloned()
            .collect();

        // Windows are processed independently and in store order. Overlapping
        // windows may therefore produce duplicate start times; the output is
        // deliberately not de-duplicated.
        let mut slots = Vec::new();
        for window in windows.iter() {
            let window_end = PrimitiveDateTime::new(date, window.end_time);
            let mut slot_start = PrimitiveDateTime::new(date, window.start_time);
            // checked_add keeps oversized durations (or dates near the
            // calendar ceiling) from panicking; a slot that cannot be
            // represented does not fit.
            while let Some(slot_end) = slot_start.checked_add(slot_length) {
                if slot_end > window_end {
                    break;
                }
                let taken = approved.iter().any(|appointment| {
                    intervals_overlap(slot_start, slot_end, appointment.start, appointment.end)
                });
                if !taken {
                    slots.push(slot_start);
                }
                slot_start = slot_end;
            }
        }

        self.transaction_dao.commit(tx).await?;
        Ok(slots.into())
    }
}
