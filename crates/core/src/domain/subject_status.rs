use std::fmt;
use std::str::FromStr;

use super::{DomainError, Role};

/// Review state of a subject.
///
/// Administrators may move a subject between any two states. The only
/// implicit transition is back to `Pending` when the owning supervisor edits
/// the subject, see [`SubjectStatus::after_edit_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubjectStatus {
    #[default]
    Pending,
    Validated,
    NeedsModification,
    Refused,
}

impl SubjectStatus {
    pub const ALL: [SubjectStatus; 4] = [
        SubjectStatus::Pending,
        SubjectStatus::Validated,
        SubjectStatus::NeedsModification,
        SubjectStatus::Refused,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubjectStatus::Pending => "pending",
            SubjectStatus::Validated => "validated",
            SubjectStatus::NeedsModification => "needs_modification",
            SubjectStatus::Refused => "refused",
        }
    }

    pub fn requires_comment(self) -> bool {
        matches!(
            self,
            SubjectStatus::NeedsModification | SubjectStatus::Refused
        )
    }

    /// Students may only pick subjects in this state.
    pub fn is_open_for_selection(self) -> bool {
        self == SubjectStatus::Validated
    }

    /// Status a subject ends up in after its content was edited by `editor`.
    ///
    /// Supervisor edits always send the subject back for review, even when it
    /// was already validated. Administrator edits keep the current status.
    pub fn after_edit_by(self, editor: Role) -> SubjectStatus {
        match editor {
            Role::Admin => self,
            _ => SubjectStatus::Pending,
        }
    }
}

impl fmt::Display for SubjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubjectStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::UnknownStatus(s.to_string()))
    }
}

/// A validated administrator decision on a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    status: SubjectStatus,
    comment: Option<String>,
}

impl Review {
    pub fn new(status: SubjectStatus, comment: Option<&str>) -> Result<Self, DomainError> {
        let comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        if status.requires_comment() && comment.is_none() {
            return Err(DomainError::CommentRequired(status));
        }

        Ok(Self { status, comment })
    }

    pub fn status(&self) -> SubjectStatus {
        self.status
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn into_parts(self) -> (SubjectStatus, Option<String>) {
        (self.status, self.comment)
    }
}
