use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    trainer::{TrainerDao, TrainerEntity},
    DaoError,
};
use time::{format_description::well_known::Iso8601, PrimitiveDateTime};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct TrainerDb {
    id: Vec<u8>,
    first_name: String,
    last_name: String,
    specialty: Option<String>,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&TrainerDb> for TrainerEntity {
    type Error = DaoError;
    fn try_from(trainer: &TrainerDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(trainer.id.as_ref())?,
            first_name: trainer.first_name.as_str().into(),
            last_name: trainer.last_name.as_str().into(),
            specialty: trainer.specialty.as_ref().map(|s| s.as_str().into()),
            deleted: trainer
                .deleted
                .as_ref()
                .map(|deleted| PrimitiveDateTime::parse(deleted, &Iso8601::DATE_TIME))
                .transpose()?,
            version: Uuid::from_slice(&trainer.update_version)?,
        })
    }
}

const SELECT_COLUMNS: &str = "id, first_name, last_name, specialty, deleted, update_version";

pub struct TrainerDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl TrainerDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl TrainerDao for TrainerDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[TrainerEntity]>, DaoError> {
        sqlx::query_as::<_, TrainerDb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM trainer WHERE deleted IS NULL ORDER BY last_name, first_name"
        ))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(TrainerEntity::try_from)
        .collect::<Result<Arc<[TrainerEntity]>, DaoError>>()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<TrainerEntity>, DaoError> {
        sqlx::query_as::<_, TrainerDb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM trainer WHERE id = ? AND deleted IS NULL"
        ))
        .bind(id.as_bytes().to_vec())
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(TrainerEntity::try_from)
        .transpose()
    }

    async fn create(
        &self,
        entity: &TrainerEntity,
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
            "INSERT INTO trainer (id, first_name, last_name, specialty, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.first_name.as_ref())
        .bind(entity.last_name.as_ref())
        .bind(entity.specialty.as_ref().map(|s| s.as_ref().to_string()))
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
        entity: &TrainerEntity,
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
            "UPDATE trainer SET first_name = ?, last_name = ?, specialty = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?",
        )
        .bind(entity.first_name.as_ref())
        .bind(entity.last_name.as_ref())
        .bind(entity.specialty.as_ref().map(|s| s.as_ref().to_string()))
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
