use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOffering {
    pub id: Uuid,
    pub name: Arc<str>,
    pub duration_minutes: u32,
    pub price_cents: i64,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&dao::catalog::ServiceOfferingEntity> for ServiceOffering {
    fn from(offering: &dao::catalog::ServiceOfferingEntity) -> Self {
        Self {
            id: offering.id,
            name: offering.name.clone(),
            duration_minutes: offering.duration_minutes,
            price_cents: offering.price_cents,
            deleted: offering.deleted,
            version: offering.version,
        }
    }
}
impl From<&ServiceOffering> for dao::catalog::ServiceOfferingEntity {
    fn from(offering: &ServiceOffering) -> Self {
        Self {
            id: offering.id,
            name: offering.name.clone(),
            duration_minutes: offering.duration_minutes,
            price_cents: offering.price_cents,
            deleted: offering.deleted,
            version: offering.version,
        }
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait CatalogService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction + 'static;

    async fn get_offerings(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[ServiceOffering]>, ServiceError>;
    async fn get_offering(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<ServiceOffering, ServiceError>;
}
