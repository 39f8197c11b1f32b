use std::sync::Arc;

use async_trait::async_trait;
use service::{
    catalog::ServiceOffering,
    permission::{Authentication, ADMIN_PRIVILEGE, MEMBER_PRIVILEGE},
    ServiceError,
};
use tokio::join;
use uuid::Uuid;

pub struct CatalogServiceImpl<CatalogDao, PermissionService, TransactionDao>
where
    CatalogDao: dao::catalog::CatalogDao + Send + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = CatalogDao::Transaction> + Send + Sync,
{
    pub catalog_dao: Arc<CatalogDao>,
    pub permission_service: Arc<PermissionService>,
    pub transaction_dao: Arc<TransactionDao>,
}
impl<CatalogDao, PermissionService, TransactionDao>
    CatalogServiceImpl<CatalogDao, PermissionService, TransactionDao>
where
    CatalogDao: dao::catalog::CatalogDao + Send + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = CatalogDao::Transaction> + Send + Sync,
{
    pub fn new(
        catalog_dao: Arc<CatalogDao>,
        permission_service: Arc<PermissionService>,
        transaction_dao: Arc<TransactionDao>,
    ) -> Self {
        Self {
            catalog_dao,
            permission_service,
            transaction_dao,
        }
    }
}

#[async_trait]
impl<CatalogDao, PermissionService, TransactionDao> service::catalog::CatalogService
    for CatalogServiceImpl<CatalogDao, PermissionService, TransactionDao>
where
    CatalogDao: dao::catalog::CatalogDao + Send + Sync,
    CatalogDao::Transaction: 'static,
    PermissionService: service::permission::PermissionService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = CatalogDao::Transaction> + Send + Sync,
{
    type Context = PermissionService::Context;
    type Transaction = CatalogDao::Transaction;

    async fn get_offerings(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[ServiceOffering]>, ServiceError> {
        let (admin_permission, member_permission) = join!(
            self.permission_service
                .check_permission(ADMIN_PRIVILEGE, context.clone()),
            self.permission_service
                .check_permission(MEMBER_PRIVILEGE, context),
        );
        admin_permission.or(member_permission)?;

        let tx = self.transaction_dao.use_transaction(tx).await?;
        let offerings = self
            .catalog_dao
            .all(tx.clone())
            .await?
            .iter()
            .map(ServiceOffering::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(offerings)
    }

    async fn get_offering(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<ServiceOffering, ServiceError> {
        let (admin_permission, member_permission) = join!(
            self.permission_service
                .check_permission(ADMIN_PRIVILEGE, context.clone()),
            self.permission_service
                .check_permission(MEMBER_PRIVILEGE, context),
        );
        admin_permission.or(member_permission)?;

        let tx = self.transaction_dao.use_transaction(tx).await?;
        let offering = self
            .catalog_dao
            .find_by_id(id, tx.clone())
            .await?
            .as_ref()
            .map(ServiceOffering::from)
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(offering)
    }
}
