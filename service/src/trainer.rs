use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trainer {
    pub id: Uuid,
    pub first_name: Arc<str>,
    pub last_name: Arc<str>,
    pub specialty: Option<Arc<str>>,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl Trainer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<&dao::trainer::TrainerEntity> for Trainer {
    fn from(trainer: &dao::trainer::TrainerEntity) -> Self {
        Self {
            id: trainer.id,
            first_name: trainer.first_name.clone(),
            last_name: trainer.last_name.clone(),
            specialty: trainer.specialty.clone(),
            deleted: trainer.deleted,
            version: trainer.version,
        }
    }
}
impl From<&Trainer> for dao::trainer::TrainerEntity {
    fn from(trainer: &Trainer) -> Self {
        Self {
            id: trainer.id,
            first_name: trainer.first_name.clone(),
            last_name: trainer.last_name.clone(),
            specialty: trainer.specialty.clone(),
            deleted: trainer.deleted,
            version: trainer.version,
        }
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait TrainerService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction + 'static;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Trainer]>, ServiceError>;
    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Trainer, ServiceError>;
    async fn exists(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<bool, ServiceError>;
}
