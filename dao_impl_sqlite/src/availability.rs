use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    availability::{AvailabilityDao, AvailabilityEntity},
    DaoError,
};
use fitdesk_utils::DayOfWeek;
use time::{
    format_description::{well_known::Iso8601, BorrowedFormatItem},
    macros::format_description,
    PrimitiveDateTime, Time,
};
use uuid::Uuid;

const TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

#[derive(Debug, sqlx::FromRow)]
struct AvailabilityDb {
    id: Vec<u8>,
    trainer_id: Vec<u8>,
    day_of_week: i64,
    start_time: String,
    end_time: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&AvailabilityDb> for AvailabilityEntity {
    type Error = DaoError;
    fn try_from(window: &AvailabilityDb) -> Result<Self, Self::Error> {
        let day_of_week = u8::try_from(window.day_of_week)
            .ok()
            .and_then(DayOfWeek::from_number)
            .ok_or(DaoError::EnumValueError(window.day_of_week))?;
        Ok(Self {
            id: Uuid::from_slice(window.id.as_ref())?,
            trainer_id: Uuid::from_slice(window.trainer_id.as_ref())?,
            day_of_week,
            start_time: Time::parse(&window.start_time, TIME_FORMAT)?,
            end_time: Time::parse(&window.end_time, TIME_FORMAT)?,
            deleted: window
                .deleted
                .as_ref()
                .map(|deleted| PrimitiveDateTime::parse(deleted, &Iso8601::DATE_TIME))
                .transpose()?,
            version: Uuid::from_slice(&window.update_version)?,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, trainer_id, day_of_week, start_time, end_time, deleted, update_version";

pub struct AvailabilityDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl AvailabilityDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl AvailabilityDao for AvailabilityDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_trainer(
        &self,
        trainer_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[AvailabilityEntity]>, DaoError> {
        sqlx::query_as::<_, AvailabilityDb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM availability WHERE trainer_id = ? AND deleted IS NULL ORDER BY day_of_week, start_time"
        ))
        .bind(trainer_id.as_bytes().to_vec())
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AvailabilityEntity::try_from)
        .collect::<Result<Arc<[AvailabilityEntity]>, DaoError>>()
    }

    async fn find_by_trainer_and_day(
        &self,
        trainer_id: Uuid,
        day_of_week: DayOfWeek,
        tx: Self::Transaction,
    ) -> Result<Arc<[AvailabilityEntity]>, DaoError> {
        sqlx::query_as::<_, AvailabilityDb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM availability WHERE trainer_id = ? AND day_of_week = ? AND deleted IS NULL ORDER BY start_time"
        ))
        .bind(trainer_id.as_bytes().to_vec())
        .bind(i64::from(day_of_week.to_number()))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AvailabilityEntity::try_from)
        .collect::<Result<Arc<[AvailabilityEntity]>, DaoError>>()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AvailabilityEntity>, DaoError> {
        sqlx::query_as::<_, AvailabilityDb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM availability WHERE id = ? AND deleted IS NULL"
        ))
        .bind(id.as_bytes().to_vec())
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(AvailabilityEntity::try_from)
        .transpose()
    }

    async fn create(
        &self,
        entity: &AvailabilityEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let start_time = entity.start_time.format(TIME_FORMAT).map_db_error()?;
        let end_time = entity.end_time.format(TIME_FORMAT).map_db_error()?;
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()
            .map_db_error()?;
        sqlx::query(
            "INSERT INTO availability (id, trainer_id, day_of_week, start_time, end_time, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.trainer_id.as_bytes().to_vec())
        .bind(i64::from(entity.day_of_week.to_number()))
        .bind(start_time)
        .bind(end_time)
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
        entity: &AvailabilityEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let start_time = entity.start_time.format(TIME_FORMAT).map_db_error()?;
        let end_time = entity.end_time.format(TIME_FORMAT).map_db_error()?;
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()
            .map_db_error()?;
        sqlx::query(
            "UPDATE availability SET trainer_id = ?, day_of_week = ?, start_time = ?, end_time = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?",
        )
        .bind(entity.trainer_id.as_bytes().to_vec())
        .bind(i64::from(entity.day_of_week.to_number()))
        .bind(start_time)
        .bind(end_time)
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
