use std::str::FromStr;
use std::sync::Arc;

use internship_core::domain::{
    AuthContext, EmailAddress, NotificationDispatcher, Review, Role, SubjectDraft, SubjectFields,
    SubjectId, SubjectStatus, Template,
};
use tracing::{info, warn};

use super::{ServiceResult, not_found};
use crate::repository::{SubjectFilter, SubjectRecord, SubjectRepository};

/// Submission, editing and review of internship subjects.
#[derive(Clone)]
pub struct SubjectLifecycle {
    subjects: Arc<dyn SubjectRepository>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl SubjectLifecycle {
    pub fn new(
        subjects: Arc<dyn SubjectRepository>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self { subjects, notifier }
    }

    #[tracing::instrument(skip_all, fields(caller = %ctx.user_id))]
    pub async fn create_subject(
        &self,
        ctx: &AuthContext,
        fields: SubjectFields,
    ) -> ServiceResult<SubjectRecord> {
        ctx.require_role(&[Role::Supervisor, Role::Admin])?;
        let draft = SubjectDraft::new(fields)?;

        let subject = self.subjects.create(ctx.user_id, draft).await?;
        info!(subject_id = %subject.id, "subject submitted");
        Ok(subject)
    }

    /// An edit by the owning supervisor sends the subject back to review;
    /// an administrator's edit keeps the current status.
    #[tracing::instrument(skip_all, fields(caller = %ctx.user_id, %subject_id))]
    pub async fn update_subject(
        &self,
        ctx: &AuthContext,
        subject_id: SubjectId,
        fields: SubjectFields,
    ) -> ServiceResult<SubjectRecord> {
        let existing = self
            .subjects
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| not_found("Subject"))?;
        ctx.require_owner_or_admin(existing.supervisor_id)?;

        let draft = SubjectDraft::new(fields)?;
        let status = existing.status.after_edit_by(ctx.role);

        let subject = self
            .subjects
            .update_content(subject_id, draft, status)
            .await?
            .ok_or_else(|| not_found("Subject"))?;
        info!(from = %existing.status, to = %subject.status, "subject updated");
        Ok(subject)
    }

    /// The supervisor is notified in the background once the review is
    /// stored; delivery problems are only logged.
    #[tracing::instrument(skip(self, ctx, comment), fields(caller = %ctx.user_id))]
    pub async fn review_subject(
        &self,
        ctx: &AuthContext,
        subject_id: SubjectId,
        status: &str,
        comment: Option<&str>,
    ) -> ServiceResult<SubjectRecord> {
        ctx.require_role(&[Role::Admin])?;
        let review = Review::new(SubjectStatus::from_str(status)?, comment)?;

        let (status, comment) = review.into_parts();
        let subject = self
            .subjects
            .update_review(subject_id, status, comment)
            .await?
            .ok_or_else(|| not_found("Subject"))?;
        info!(%status, "subject reviewed");

        self.notify_review(&subject);
        Ok(subject)
    }

    fn notify_review(&self, subject: &SubjectRecord) {
        let Some(template) = Template::subject_reviewed(
            subject.status,
            subject.admin_comment.as_deref(),
            &subject.title,
            &subject.main_supervisor_name,
        ) else {
            return;
        };
        let recipient = match EmailAddress::parse(&subject.main_supervisor_email) {
            Ok(recipient) => recipient,
            Err(err) => {
                warn!(subject_id = %subject.id, error = %err, "review notification skipped");
                return;
            }
        };

        let notification = template.render(recipient);
        let notifier = Arc::clone(&self.notifier);
        let subject_id = subject.id;
        tokio::spawn(async move {
            if let Err(err) = notifier.send(notification).await {
                warn!(
                    %subject_id,
                    provider = notifier.name(),
                    error = %err,
                    "failed to send review notification"
                );
            }
        });
    }

    pub async fn list_validated_subjects(
        &self,
        _ctx: &AuthContext,
    ) -> ServiceResult<Vec<SubjectRecord>> {
        Ok(self
            .subjects
            .list(SubjectFilter::Status(SubjectStatus::Validated))
            .await?)
    }

    /// What the caller's dashboard shows.
    pub async fn list_subjects(&self, ctx: &AuthContext) -> ServiceResult<Vec<SubjectRecord>> {
        let filter = match ctx.role {
            Role::Admin | Role::Observer => SubjectFilter::All,
            Role::Supervisor => SubjectFilter::Supervisor(ctx.user_id),
            Role::Student => SubjectFilter::Status(SubjectStatus::Validated),
        };
        Ok(self.subjects.list(filter).await?)
    }

    pub async fn get_subject(
        &self,
        ctx: &AuthContext,
        subject_id: SubjectId,
    ) -> ServiceResult<SubjectRecord> {
        let subject = self
            .subjects
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| not_found("Subject"))?;

        let visible = matches!(ctx.role, Role::Admin | Role::Observer)
            || subject.supervisor_id == ctx.user_id
            || subject.status == SubjectStatus::Validated;
        if !visible {
            return Err(not_found("Subject"));
        }
        Ok(subject)
    }
}
