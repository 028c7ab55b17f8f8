//! Domain operations behind the HTTP handlers.
//!
//! Every operation takes the caller's [`AuthContext`] explicitly and checks
//! its role before touching the store.
//!
//! [`AuthContext`]: internship_core::domain::AuthContext

pub mod assignments;
pub mod choices;
pub mod files;
pub mod identity;
pub mod profiles;
pub mod subjects;

use internship_core::domain::DomainError;
use thiserror::Error;
use tracing::debug;

use crate::repository::StoreError;

pub use assignments::{AssignmentAllocator, AssignmentDetail};
pub use choices::{ChoiceDetail, ChoiceRanker};
pub use files::FileService;
pub use identity::IdentityResolver;
pub use profiles::ProfileService;
pub use subjects::SubjectLifecycle;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("profile setup required")]
    ProfileMissing,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        if err.is_access_denied() {
            ServiceError::Forbidden(err.to_string())
        } else {
            ServiceError::Validation(err.to_string())
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(detail) => {
                debug!(%detail, "write refused by store constraint");
                ServiceError::Conflict(
                    "The request conflicts with a concurrent change, please retry".to_string(),
                )
            }
            StoreError::Rejected(err) => err.into(),
            StoreError::Database(err) => {
                ServiceError::Internal(anyhow::Error::new(err).context("database operation failed"))
            }
            StoreError::Corrupt(err) => ServiceError::Internal(err),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn not_found(what: &str) -> ServiceError {
    ServiceError::NotFound(format!("{what} not found"))
}
