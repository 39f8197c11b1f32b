use std::sync::Arc;

use async_trait::async_trait;
use service::{
    permission::{Authentication, ADMIN_PRIVILEGE, MEMBER_PRIVILEGE},
    trainer::Trainer,
    ServiceError,
};
use tokio::join;
use uuid::Uuid;

pub struct TrainerServiceImpl<TrainerDao, PermissionService, TransactionDao>
where
    TrainerDao: dao::trainer::TrainerDao + Send + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = TrainerDao::Transaction> + Send + Sync,
{
    pub trainer_dao: Arc<TrainerDao>,
    pub permission_service: Arc<PermissionService>,
    pub transaction_dao: Arc<TransactionDao>,
}
impl<TrainerDao, PermissionService, TransactionDao>
    TrainerServiceImpl<TrainerDao, PermissionService, TransactionDao>
where
    TrainerDao: dao::trainer::TrainerDao + Send + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = TrainerDao::Transaction> + Send + Sync,
{
    pub fn new(
        trainer_dao: Arc<TrainerDao>,
        permission_service: Arc<PermissionService>,
        transaction_dao: Arc<TransactionDao>,
    ) -> Self {
        Self {
            trainer_dao,
            permission_service,
            transaction_dao,
        }
    }
}

#[async_trait]
impl<TrainerDao, PermissionService, TransactionDao> service::trainer::TrainerService
    for TrainerServiceImpl<TrainerDao, PermissionService, TransactionDao>
where
    TrainerDao: dao::trainer::TrainerDao + Send + Sync,
    TrainerDao::Transaction: 'static,
    PermissionService: service::permission::PermissionService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = TrainerDao::Transaction> + Send + Sync,
{
    type Context = PermissionService::Context;
    type Transaction = TrainerDao::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Trainer]>, ServiceError> {
        let (admin_permission, member_permission) = join!(
            self.permission_service
                .check_permission(ADMIN_PRIVILEGE, context.clone()),
            self.permission_service
                .check_permission(MEMBER_PRIVILEGE, context),
        );
        admin_permission.or(member_permission)?;

        let tx = self.transaction_dao.use_transaction(tx).await?;
        let trainers = self
            .trainer_dao
            .all(tx.clone())
            .await?
            .iter()
            .map(Trainer::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(trainers)
    }

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Trainer, ServiceError> {
        let (admin_permission, member_permission) = join!(
            self.permission_service
                .check_permission(ADMIN_PRIVILEGE, context.clone()),
            self.permission_service
                .check_permission(MEMBER_PRIVILEGE, context),
        );
        admin_permission.or(member_permission)?;

        let tx = self.transaction_dao.use_transaction(tx).await?;
        let trainer = self
            .trainer_dao
            .find_by_id(id, tx.clone())
            .await?
            .as_ref()
            .map(Trainer::from)
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(trainer)
    }

    async fn exists(
        &self,
        id: Uuid,
        _context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<bool, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let found = self.trainer_dao.find_by_id(id, tx.clone()).await?.is_some();
        self.transaction_dao.commit(tx).await?;
        Ok(found)
    }
}
