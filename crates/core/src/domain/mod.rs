mod assignment;
mod auth;
mod choice_ranking;
mod error;
mod ids;
mod notification;
mod profile;
mod role;
mod subject;
mod subject_status;

pub use assignment::AssignmentSlots;
pub use auth::{AuthContext, require_role};
pub use choice_ranking::{ChoiceRanking, RankChange, RankedChoice};
pub use error::DomainError;
pub use ids::{AssignmentId, ChoiceId, InvalidId, SubjectId, UserId};
pub use notification::{
    Notification, NotificationDispatcher, NotificationError, NotificationKind, ReviewDecision,
    Template,
};
pub use profile::{NAME_PART_MAX_CHARS, PersonName, display_name, self_selected_role};
pub use role::Role;
pub use subject::{
    EMAIL_MAX_CHARS, EmailAddress, PERSON_NAME_MAX_CHARS, SubjectDraft, SubjectFields,
    TITLE_MAX_CHARS, split_multi_value,
};
pub use subject_status::{Review, SubjectStatus};
