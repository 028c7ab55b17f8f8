use thiserror::Error;

use super::{Role, SubjectStatus};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} is required")]
    EmptyField(&'static str),
    #[error("{0} must be at most {1} characters")]
    TooLong(&'static str, usize),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("unknown subject status: {0}")]
    UnknownStatus(String),
    #[error("the admin role cannot be selected during profile setup")]
    AdminRoleNotSelectable,
    #[error("role {role} is not allowed to perform this action")]
    RoleNotAllowed { role: Role },
    #[error("only the owning supervisor or an administrator may edit this subject")]
    NotSubjectOwner,
    #[error("a comment is required when setting status to {0}")]
    CommentRequired(SubjectStatus),
    #[error("This subject is not available for selection")]
    SubjectNotAvailable,
    #[error("This subject is already in your choices")]
    DuplicateChoice,
    #[error("You can only select up to {0} subjects")]
    ChoiceLimitExceeded(usize),
    #[error("Student already has an assignment")]
    StudentAlreadyAssigned,
    #[error("Subject is already assigned to another student")]
    SubjectAlreadyAssigned,
    #[error("choice ranks must be contiguous from 1, found {0:?}")]
    NonContiguousRanks(Vec<u8>),
}

impl DomainError {
    /// Whether the violation is about who is asking rather than what was asked.
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            Self::AdminRoleNotSelectable | Self::RoleNotAllowed { .. } | Self::NotSubjectOwner
        )
    }
}
