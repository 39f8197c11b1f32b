use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

pub mod appointment;
pub mod availability;
pub mod catalog;
pub mod clock;
pub mod permission;
pub mod scheduling;
pub mod trainer;
pub mod user_service;
pub mod uuid_service;

pub use permission::PermissionService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailureItem {
    InvalidValue(Arc<str>),
    MissingField(Arc<str>),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] dao::DaoError),

    #[error("Forbidden")]
    Forbidden,

    #[error("Entity {0} not found")]
    EntityNotFound(Uuid),

    #[error("Id must not be set on create")]
    IdSetOnCreate,

    #[error("Version must not be set on create")]
    VersionSetOnCreate,

    #[error("Validation failed: {0:?}")]
    ValidationError(Arc<[ValidationFailureItem]>),

    #[error("Time {0} must be before {1}")]
    TimeOrderWrong(time::Time, time::Time),

    #[error("Time range overlaps an existing availability window")]
    OverlappingTimeRange,

    #[error("Requested time is outside the trainer's working hours")]
    OutsideWorkingHours,

    #[error("Time slot unavailable")]
    TimeSlotTaken,

    #[error("Internal error")]
    InternalError,
}
