use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

/// A bookable service from the catalog (personal training, yoga, ...).
/// Duration and price are the inputs to booking validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceOfferingEntity {
    pub id: Uuid,
    pub name: Arc<str>,
    pub duration_minutes: u32,
    pub price_cents: i64,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait CatalogDao {
    type Transaction: crate::Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[ServiceOfferingEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ServiceOfferingEntity>, DaoError>;
    async fn create(
        &self,
        entity: &ServiceOfferingEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &ServiceOfferingEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
