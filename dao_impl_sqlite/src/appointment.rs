use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    appointment::{AppointmentDao, AppointmentEntity, AppointmentStatus},
    DaoError,
};
use time::{format_description::well_known::Iso8601, PrimitiveDateTime};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct AppointmentDb {
    id: Vec<u8>,
    trainer_id: Vec<u8>,
    offering_id: Vec<u8>,
    member_id: String,
    start_datetime: String,
    end_datetime: String,
    price_cents: i64,
    status: i64,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&AppointmentDb> for AppointmentEntity {
    type Error = DaoError;
    fn try_from(appointment: &AppointmentDb) -> Result<Self, Self::Error> {
        let status = u8::try_from(appointment.status)
            .ok()
            .and_then(AppointmentStatus::from_number)
            .ok_or(DaoError::EnumValueError(appointment.status))?;
        Ok(Self {
            id: Uuid::from_slice(appointment.id.as_ref())?,
            trainer_id: Uuid::from_slice(appointment.trainer_id.as_ref())?,
            offering_id: Uuid::from_slice(appointment.offering_id.as_ref())?,
            member_id: appointment.member_id.as_str().into(),
            start: PrimitiveDateTime::parse(&appointment.start_datetime, &Iso8601::DATE_TIME)?,
            end: PrimitiveDateTime::parse(&appointment.end_datetime, &Iso8601::DATE_TIME)?,
            price_cents: appointment.price_cents,
            status,
            created: PrimitiveDateTime::parse(&appointment.created, &Iso8601::DATE_TIME)?,
            deleted: appointment
                .deleted
                .as_ref()
                .map(|deleted| PrimitiveDateTime::parse(deleted, &Iso8601::DATE_TIME))
                .transpose()?,
            version: Uuid::from_slice(&appointment.update_version)?,
        })
    }
}

const SELECT_COLUMNS: &str = "id, trainer_id, offering_id, member_id, start_datetime, end_datetime, price_cents, status, created, deleted, update_version";

pub struct AppointmentDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl AppointmentDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl AppointmentDao for AppointmentDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[AppointmentEntity]>, DaoError> {
        sqlx::query_as::<_, AppointmentDb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM appointment WHERE deleted IS NULL ORDER BY start_datetime DESC"
        ))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AppointmentEntity::try_from)
        .collect::<Result<Arc<[AppointmentEntity]>, DaoError>>()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AppointmentEntity>, DaoError> {
        sqlx::query_as::<_, AppointmentDb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM appointment WHERE id = ? AND deleted IS NULL"
        ))
        .bind(id.as_bytes().to_vec())
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(AppointmentEntity::try_from)
        .transpose()
    }

    async fn find_by_trainer_in_range(
        &self,
        trainer_id: Uuid,
        from: PrimitiveDateTime,
        until: PrimitiveDateTime,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError> {
        let from = from.format(&Iso8601::DATE_TIME).map_db_error()?;
        let until = until.format(&Iso8601::DATE_TIME).map_db_error()?;
        // Iso8601 datetimes compare correctly as strings.
        sqlx::query_as::<_, AppointmentDb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM appointment WHERE trainer_id = ? AND start_datetime < ? AND end_datetime > ? AND deleted IS NULL ORDER BY start_datetime"
        ))
        .bind(trainer_id.as_bytes().to_vec())
        .bind(until)
        .bind(from)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AppointmentEntity::try_from)
        .collect::<Result<Arc<[AppointmentEntity]>, DaoError>>()
    }

    async fn find_by_member(
        &self,
        member_id: &str,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError> {
        sqlx::query_as::<_, AppointmentDb>(&format!(
            "SELECT {SELECT_COLUMNS} FROM appointment WHERE member_id = ? AND deleted IS NULL ORDER BY start_datetime DESC"
        ))
        .bind(member_id.to_string())
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AppointmentEntity::try_from)
        .collect::<Result<Arc<[AppointmentEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &AppointmentEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let start = entity.start.format(&Iso8601::DATE_TIME).map_db_error()?;
        let end = entity.end.format(&Iso8601::DATE_TIME).map_db_error()?;
        let created = entity.created.format(&Iso8601::DATE_TIME).map_db_error()?;
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()
            .map_db_error()?;
        sqlx::query(
            "INSERT INTO appointment (id, trainer_id, offering_id, member_id, start_datetime, end_datetime, price_cents, status, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.trainer_id.as_bytes().to_vec())
        .bind(entity.offering_id.as_bytes().to_vec())
        .bind(entity.member_id.as_ref())
        .bind(start)
        .bind(end)
        .bind(entity.price_cents)
        .bind(i64::from(entity.status.to_number()))
        .bind(created)
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
        entity: &AppointmentEntity,
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
            "UPDATE appointment SET status = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?",
        )
        .bind(i64::from(entity.status.to_number()))
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
