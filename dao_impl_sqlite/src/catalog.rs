use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    catalog::{CatalogDao, ServiceOfferingEntity},
    DaoError,
};
use time::{format_description::well_known::Iso8601, PrimitiveDateTime};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct ServiceOfferingDb {
    id: Vec<u8>,
    name: String,
    duration_minutes: i64,
    price_cents: i64,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&ServiceOfferingDb> for ServiceOfferingEntity {
    type Error = DaoError;
    fn try_from(offering: &ServiceOfferingDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(offering.id.as_ref())?,
            name: offering.name.as_str().into(),
            duration_minutes: u32::try_from(offering.duration_minutes)
                .map_err(|_| DaoError::EnumValueError(offering.duration_minutes))?,
            price_cents: offering.price_cents,
            deleted: offering
                .deleted
                .as_ref()
                .map(|deleted| PrimitiveDateTime::parse(deleted, &Iso8601::DATE_TIME))
                .transpose()?,
            version: Uuid::from_slice(&offering.update_version)?,
        })
    }
}

const SELECT_COLUMNS: &str = "id, name, duration_minutes, price_cents, deleted, update_version";

pub struct CatalogDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl CatalogDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl CatalogDao for CatalogDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[ServiceOfferingEntity]>, DaoError> {
        sqlx::query_as::<_, ServiceOfferingDb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM service_offering WHERE deleted IS NULL ORDER BY name"
        ))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(ServiceOfferingEntity::try_from)
        .collect::<Result<Arc<[ServiceOfferingEntity]>, DaoError>>()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ServiceOfferingEntity>, DaoError> {
        sqlx::query_as::<_, ServiceOfferingDb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM service_offering WHERE id = ? AND deleted IS NULL"
        ))
        .bind(id.as_bytes().to_vec())
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(ServiceOfferingEntity::try_from)
        .transpose()
    }

    async fn create(
        &self,
        entity: &ServiceOfferingEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()
            .map_db_error()?;
        sqlx::query(
            "INSERT INTO service_offering (id, name, duration_minutes, price_cents, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.name.as_ref())
        .bind(i64::from(entity.duration_minutes))
        .bind(entity.price_cents)
        .bind(deleted)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &ServiceOfferingEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()
            .map_db_error()?;
        sqlx::query(
            "UPDATE service_offering SET name = ?, duration_minutes = ?, price_cents = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?",
        )
        .bind(entity.name.as_ref())
        .bind(i64::from(entity.duration_minutes))
        .bind(entity.price_cents)
        .bind(deleted)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .bind(entity.id.as_bytes().to_vec())
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }
}
