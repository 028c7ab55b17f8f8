use async_trait::async_trait;
use thiserror::Error;

use super::{EmailAddress, SubjectStatus};

const SIGNATURE: &str = "Best regards,\nThe Internship Management Team";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    SubjectReviewed,
    AssignmentConfirmed,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::SubjectReviewed => "subject_reviewed",
            NotificationKind::AssignmentConfirmed => "assignment_confirmed",
        }
    }
}

/// Review outcomes that are announced to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Validated,
    NeedsModification,
    Refused,
}

impl ReviewDecision {
    /// `None` for `Pending`, which is not a decision.
    pub fn from_status(status: SubjectStatus) -> Option<Self> {
        match status {
            SubjectStatus::Validated => Some(Self::Validated),
            SubjectStatus::NeedsModification => Some(Self::NeedsModification),
            SubjectStatus::Refused => Some(Self::Refused),
            SubjectStatus::Pending => None,
        }
    }
}

/// Data needed to render one e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    SubjectReviewed {
        decision: ReviewDecision,
        comment: Option<String>,
        subject_title: String,
        supervisor_name: String,
    },
    AssignmentConfirmed {
        student_name: String,
        subject_title: String,
        supervisor_name: String,
        platform_url: String,
    },
}

impl Template {
    /// Review template for the given decision. Sending a subject back to
    /// `Pending` is not announced.
    pub fn subject_reviewed(
        status: SubjectStatus,
        comment: Option<&str>,
        subject_title: &str,
        supervisor_name: &str,
    ) -> Option<Self> {
        ReviewDecision::from_status(status).map(|decision| Template::SubjectReviewed {
            decision,
            comment: comment.map(str::to_string),
            subject_title: subject_title.to_string(),
            supervisor_name: supervisor_name.to_string(),
        })
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            Template::SubjectReviewed { .. } => NotificationKind::SubjectReviewed,
            Template::AssignmentConfirmed { .. } => NotificationKind::AssignmentConfirmed,
        }
    }

    pub fn render(&self, recipient: EmailAddress) -> Notification {
        let (subject, body) = match self {
            Template::SubjectReviewed {
                decision,
                comment,
                subject_title,
                supervisor_name,
            } => render_review(*decision, comment.as_deref(), subject_title, supervisor_name),
            Template::AssignmentConfirmed {
                student_name,
                subject_title,
                supervisor_name,
                platform_url,
            } => (
                "Internship Assignment Confirmation".to_string(),
                format!(
                    "Dear {student_name},\n\n\
                     We are pleased to inform you that you have been assigned to an internship.\n\n\
                     Internship subject: {subject_title}\n\
                     Supervisor: {supervisor_name}\n\n\
                     Please contact your supervisor to discuss the next steps. \
                     Details are available on the platform: {platform_url}\n\n\
                     {SIGNATURE}\n"
                ),
            ),
        };

        Notification {
            recipient,
            kind: self.kind(),
            subject,
            body,
        }
    }
}

fn render_review(
    decision: ReviewDecision,
    comment: Option<&str>,
    title: &str,
    supervisor_name: &str,
) -> (String, String) {
    let feedback = comment.unwrap_or("No specific feedback provided.");
    match decision {
        ReviewDecision::Validated => (
            format!("Your internship subject \"{title}\" has been validated"),
            format!(
                "Dear {supervisor_name},\n\n\
                 Your internship subject has been validated and is now available for student selection.\n\n\
                 Subject: {title}\nStatus: Validated\n\n{SIGNATURE}\n"
            ),
        ),
        ReviewDecision::NeedsModification => (
            format!("Your internship subject \"{title}\" needs modification"),
            format!(
                "Dear {supervisor_name},\n\n\
                 Your internship subject requires some modifications before it can be validated.\n\n\
                 Subject: {title}\nStatus: Needs Modification\n\nAdmin feedback:\n{feedback}\n\n\
                 Please edit your subject and resubmit it for review.\n\n{SIGNATURE}\n"
            ),
        ),
        ReviewDecision::Refused => (
            format!("Your internship subject \"{title}\" has been refused"),
            format!(
                "Dear {supervisor_name},\n\n\
                 Unfortunately, your internship subject has been refused.\n\n\
                 Subject: {title}\nStatus: Refused\n\nAdmin feedback:\n{feedback}\n\n\
                 If you have questions about this decision, please contact the administration.\n\n\
                 {SIGNATURE}\n"
            ),
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: EmailAddress,
    pub kind: NotificationKind,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    #[error("notification provider unavailable: {0}")]
    Unavailable(String),
    #[error("notification provider timeout")]
    Timeout,
    #[error("notification rejected: {0}")]
    Rejected(String),
}

/// Outbound e-mail channel. One implementation is chosen at startup.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, notification: Notification) -> Result<(), NotificationError>;
}
