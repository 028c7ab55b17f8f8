//! Persistence behind traits, implemented with sea-orm.
//!
//! Enum columns are stored as small integer codes; the code tables live here
//! and mirror the CHECK constraints of the migration.

pub mod assignment_repository;
pub mod choice_repository;
pub mod profile_repository;
pub mod subject_repository;

use anyhow::anyhow;
use chrono::{NaiveDateTime, Utc};
use internship_core::domain::{DomainError, Role, SubjectStatus};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub use assignment_repository::{
    AssignmentRecord, AssignmentRepository, NewAssignment, SeaOrmAssignmentRepository,
};
pub use choice_repository::{ChoiceRecord, ChoiceRepository, SeaOrmChoiceRepository};
pub use profile_repository::{NewProfile, ProfileRecord, ProfileRepository, SeaOrmProfileRepository};
pub use subject_repository::{
    SeaOrmSubjectRepository, SubjectFilter, SubjectRecord, SubjectRepository,
};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness or foreign-key constraint refused the write.
    #[error("conflicting write: {0}")]
    Conflict(String),
    /// A domain rule evaluated inside a transaction refused the write.
    #[error(transparent)]
    Rejected(#[from] DomainError),
    #[error("database error: {0}")]
    Database(DbErr),
    #[error(transparent)]
    Corrupt(#[from] anyhow::Error),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail))
            | Some(SqlErr::ForeignKeyConstraintViolation(detail)) => StoreError::Conflict(detail),
            _ => StoreError::Database(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub(crate) fn map_role(code: i16) -> anyhow::Result<Role> {
    match code {
        0 => Ok(Role::Student),
        1 => Ok(Role::Supervisor),
        2 => Ok(Role::Admin),
        3 => Ok(Role::Observer),
        _ => Err(anyhow!("invalid profile.role code from database: {code}")),
    }
}

pub(crate) fn map_role_code(role: Role) -> i16 {
    match role {
        Role::Student => 0,
        Role::Supervisor => 1,
        Role::Admin => 2,
        Role::Observer => 3,
    }
}

pub(crate) fn map_status(code: i16) -> anyhow::Result<SubjectStatus> {
    match code {
        0 => Ok(SubjectStatus::Pending),
        1 => Ok(SubjectStatus::Validated),
        2 => Ok(SubjectStatus::NeedsModification),
        3 => Ok(SubjectStatus::Refused),
        _ => Err(anyhow!("invalid subject.status code from database: {code}")),
    }
}

pub(crate) fn map_status_code(status: SubjectStatus) -> i16 {
    match status {
        SubjectStatus::Pending => 0,
        SubjectStatus::Validated => 1,
        SubjectStatus::NeedsModification => 2,
        SubjectStatus::Refused => 3,
    }
}
