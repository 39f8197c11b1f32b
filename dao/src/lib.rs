use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub mod appointment;
pub mod availability;
pub mod catalog;
pub mod trainer;

#[derive(Error, Debug)]
pub enum DaoError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(Box<dyn std::error::Error + Send + Sync>),

    #[error("Could not parse datetime: {0}")]
    DateTimeParseError(#[from] time::error::Parse),

    #[error("Invalid uuid: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Invalid enum value: {0}")]
    EnumValueError(i64),
}

/// Marker for transaction-scoped store handles. Every DAO call runs on an
/// explicit handle so a conflict-check read and the following write share
/// one database transaction.
pub trait Transaction: Clone + Send + Sync + std::fmt::Debug {}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MockTransaction;
impl Transaction for MockTransaction {}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait TransactionDao {
    type Transaction: Transaction + 'static;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError>;
    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError>;
    async fn commit(&self, tx: Self::Transaction) -> Result<(), DaoError>;
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct UserEntity {
    pub name: Arc<str>,
}

#[automock]
#[async_trait]
pub trait PermissionDao {
    async fn has_privilege(&self, user: &str, privilege: &str) -> Result<bool, DaoError>;
    async fn create_user(&self, user: &UserEntity, process: &str) -> Result<(), DaoError>;
    async fn find_user(&self, username: &str) -> Result<Option<UserEntity>, DaoError>;
    async fn all_users(&self) -> Result<Arc<[UserEntity]>, DaoError>;
    async fn add_user_role(&self, user: &str, role: &str, process: &str) -> Result<(), DaoError>;
}
