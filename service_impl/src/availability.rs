use std::sync::Arc;

use async_trait::async_trait;
use service::{
    availability::TimeWindow,
    permission::{Authentication, ADMIN_PRIVILEGE, MEMBER_PRIVILEGE},
    ServiceError,
};
use tokio::join;
use uuid::Uuid;

const AVAILABILITY_SERVICE_PROCESS: &str = "availability-service";

/// Windows may overlap (the slot calculator tolerates that), but an exact
/// duplicate of an existing window is always an authoring mistake.
pub fn duplicate_window(window_1: &TimeWindow, window_2: &TimeWindow) -> bool {
    window_1.trainer_id == window_2.trainer_id
        && window_1.day_of_week == window_2.day_of_week
        && window_1.start_time == window_2.start_time
        && window_1.end_time == window_2.end_time
}

pub struct AvailabilityServiceImpl<
    AvailabilityDao,
    PermissionService,
    ClockService,
    UuidService,
    TransactionDao,
> where
    AvailabilityDao: dao::availability::AvailabilityDao + Send + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = AvailabilityDao::Transaction> + Send + Sync,
{
    pub availability_dao: Arc<AvailabilityDao>,
    pub permission_service: Arc<PermissionService>,
    pub clock_service: Arc<ClockService>,
    pub uuid_service: Arc<UuidService>,
    pub transaction_dao: Arc<TransactionDao>,
}
impl<AvailabilityDao, PermissionService, ClockService, UuidService, TransactionDao>
    AvailabilityServiceImpl<
        AvailabilityDao,
        PermissionService,
        ClockService,
        UuidService,
        TransactionDao,
    >
where
    AvailabilityDao: dao::availability::AvailabilityDao + Send + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = AvailabilityDao::Transaction> + Send + Sync,
{
    pub fn new(
        availability_dao: Arc<AvailabilityDao>,
        permission_service: Arc<PermissionService>,
        clock_service: Arc<ClockService>,
        uuid_service: Arc<UuidService>,
        transaction_dao: Arc<TransactionDao>,
    ) -> Self {
        Self {
            availability_dao,
            permission_service,
            clock_service,
            uuid_service,
            transaction_dao,
        }
    }
}

#[async_trait]
impl<AvailabilityDao, PermissionService, ClockService, UuidService, TransactionDao>
    service::availability::AvailabilityService
    for AvailabilityServiceImpl<
        AvailabilityDao,
        PermissionService,
        ClockService,
        UuidService,
        TransactionDao,
    >
where
    AvailabilityDao: dao::availability::AvailabilityDao + Send + Sync,
    AvailabilityDao::Transaction: 'static,
    PermissionService: service::permission::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = AvailabilityDao::Transaction> + Send + Sync,
{
    type Context = PermissionService::Context;
    type Transaction = AvailabilityDao::Transaction;

    async fn get_for_trainer(
        &self,
        trainer_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[TimeWindow]>, ServiceError> {
        let (admin_permission, member_permission) = join!(
            self.permission_service
                .check_permission(ADMIN_PRIVILEGE, context.clone()),
            self.permission_service
                .check_permission(MEMBER_PRIVILEGE, context),
        );
        admin_permission.or(member_permission)?;

        let tx = self.transaction_dao.use_transaction(tx).await?;
        let windows = self
            .availability_dao
            .find_by_trainer(trainer_id, tx.clone())
            .await?
            .iter()
            .map(TimeWindow::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(windows)
    }

    async fn create(
        &self,
        window: &TimeWindow,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<TimeWindow, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;

        if window.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if window.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        if window.start_time >= window.end_time {
            return Err(ServiceError::TimeOrderWrong(
                window.start_time,
                window.end_time,
            ));
        }

        let tx = self.transaction_dao.use_transaction(tx).await?;
        if self
            .availability_dao
            .find_by_trainer_and_day(window.trainer_id, window.day_of_week, tx.clone())
            .await?
            .iter()
            .map(TimeWindow::from)
            .any(|existing| duplicate_window(window, &existing))
        {
            return Err(ServiceError::OverlappingTimeRange);
        }

        let window = TimeWindow {
            id: self.uuid_service.new_uuid("availability-id"),
            version: self.uuid_service.new_uuid("availability-version"),
            ..window.clone()
        };
        self.availability_dao
            .create(&(&window).into(), AVAILABILITY_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(window)
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
        let mut window = self
            .availability_dao
            .find_by_id(id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(id))?;
        window.deleted = Some(self.clock_service.date_time_now());
        window.version = self.uuid_service.new_uuid("availability-version");
        self.availability_dao
            .update(&window, AVAILABILITY_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}
