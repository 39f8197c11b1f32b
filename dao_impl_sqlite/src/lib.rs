use std::sync::Arc;

use async_trait::async_trait;
use dao::{DaoError, Transaction, UserEntity};
use sqlx::SqlitePool;
use tokio::sync::Mutex;

pub mod appointment;
pub mod availability;
pub mod catalog;
pub mod trainer;

pub trait ResultDbErrorExt<T, E> {
    fn map_db_error(self) -> Result<T, DaoError>;
}
impl<T, E: std::error::Error + Send + Sync + 'static> ResultDbErrorExt<T, E> for Result<T, E> {
    fn map_db_error(self) -> Result<T, DaoError> {
        self.map_err(|err| DaoError::DatabaseQueryError(Box::new(err)))
    }
}

/// Shared handle on one sqlite transaction. Clones all point at the same
/// transaction; `commit` only acts once the last clone is handed back.
#[derive(Clone)]
pub struct TransactionImpl {
    tx: Arc<Mutex<sqlx::Transaction<'static, sqlx::Sqlite>>>,
}
impl std::fmt::Debug for TransactionImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TransactionImpl")
    }
}
impl Transaction for TransactionImpl {}

pub struct TransactionDaoImpl {
    pool: Arc<SqlitePool>,
}
impl TransactionDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}
#[async_trait]
impl dao::TransactionDao for TransactionDaoImpl {
    type Transaction = TransactionImpl;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError> {
        let tx = self.pool.begin().await.map_db_error()?;
        Ok(TransactionImpl {
            tx: Arc::new(tx.into()),
        })
    }

    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError> {
        match tx {
            Some(tx) => Ok(tx),
            None => self.new_transaction().await,
        }
    }

    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError> {
        if let Some(tx) = Arc::into_inner(transaction.tx) {
            tx.into_inner().commit().await.map_db_error()?;
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserDb {
    name: String,
}

pub struct PermissionDaoImpl {
    pool: Arc<SqlitePool>,
}
impl PermissionDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}
#[async_trait]
impl dao::PermissionDao for PermissionDaoImpl {
    async fn has_privilege(&self, user: &str, privilege: &str) -> Result<bool, DaoError> {
        let count: i64 = sqlx::query_scalar(
            r"SELECT count(*) FROM user
                                 INNER JOIN user_role ON user.name = user_role.user_name
                                 INNER JOIN role ON user_role.role_name = role.name
                                 INNER JOIN role_privilege ON role.name = role_privilege.role_name
                                 WHERE role_privilege.privilege_name = ? AND user.name = ?",
        )
        .bind(privilege)
        .bind(user)
        .fetch_one(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(count > 0)
    }

    async fn create_user(&self, user: &UserEntity, process: &str) -> Result<(), DaoError> {
        sqlx::query(r"INSERT INTO user (name, update_process) VALUES (?, ?)")
            .bind(user.name.as_ref())
            .bind(process)
            .execute(self.pool.as_ref())
            .await
            .map_db_error()?;
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<Option<UserEntity>, DaoError> {
        let result: Option<UserDb> =
            sqlx::query_as(r"SELECT name FROM user WHERE name = ?")
                .bind(username)
                .fetch_optional(self.pool.as_ref())
                .await
                .map_db_error()?;
        Ok(result.map(|row| UserEntity {
            name: row.name.into(),
        }))
    }

    async fn all_users(&self) -> Result<Arc<[UserEntity]>, DaoError> {
        let result: Vec<UserDb> = sqlx::query_as(r"SELECT name FROM user")
            .fetch_all(self.pool.as_ref())
            .await
            .map_db_error()?;
        Ok(result
            .into_iter()
            .map(|row| UserEntity {
                name: row.name.into(),
            })
            .collect())
    }

    async fn add_user_role(&self, user: &str, role: &str, process: &str) -> Result<(), DaoError> {
        sqlx::query(
            r"INSERT INTO user_role (user_name, role_name, update_process) VALUES (?, ?, ?)",
        )
        .bind(user)
        .bind(role)
        .bind(process)
        .execute(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(())
    }
}
