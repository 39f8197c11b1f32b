use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainerEntity {
    pub id: Uuid,
    pub first_name: Arc<str>,
    pub last_name: Arc<str>,
    pub specialty: Option<Arc<str>>,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait TrainerDao {
    type Transaction: crate::Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[TrainerEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<TrainerEntity>, DaoError>;
    async fn create(
        &self,
        entity: &TrainerEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &TrainerEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
