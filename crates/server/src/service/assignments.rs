use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use internship_core::domain::{
    AssignmentId, AssignmentSlots, AuthContext, EmailAddress, NotificationDispatcher, Role,
    SubjectId, Template, UserId,
};
use tracing::info;

use super::{ServiceError, ServiceResult, not_found};
use crate::repository::{
    AssignmentRecord, AssignmentRepository, NewAssignment, ProfileRecord, ProfileRepository,
    SubjectRecord, SubjectRepository,
};

#[derive(Debug, Clone)]
pub struct AssignmentDetail {
    pub assignment: AssignmentRecord,
    pub student: ProfileRecord,
    pub subject: SubjectRecord,
    pub assigned_by: Option<ProfileRecord>,
}

/// One student per subject, one subject per student.
#[derive(Clone)]
pub struct AssignmentAllocator {
    assignments: Arc<dyn AssignmentRepository>,
    profiles: Arc<dyn ProfileRepository>,
    subjects: Arc<dyn SubjectRepository>,
    notifier: Arc<dyn NotificationDispatcher>,
    platform_url: String,
}

impl AssignmentAllocator {
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        profiles: Arc<dyn ProfileRepository>,
        subjects: Arc<dyn SubjectRepository>,
        notifier: Arc<dyn NotificationDispatcher>,
        platform_url: impl Into<String>,
    ) -> Self {
        Self {
            assignments,
            profiles,
            subjects,
            notifier,
            platform_url: platform_url.into(),
        }
    }

    /// The slot checks are a fast path; the unique indexes decide races,
    /// which surface as `Conflict`.
    #[tracing::instrument(skip(self, ctx), fields(admin_id = %ctx.user_id))]
    pub async fn create_assignment(
        &self,
        ctx: &AuthContext,
        student_id: UserId,
        subject_id: SubjectId,
    ) -> ServiceResult<AssignmentRecord> {
        ctx.require_role(&[Role::Admin])?;

        match self.profiles.find_by_id(student_id).await? {
            Some(profile) if profile.role == Role::Student => {}
            Some(_) => {
                return Err(ServiceError::Validation(
                    "Only students can be assigned a subject".to_string(),
                ));
            }
            None => return Err(ServiceError::Validation("Student not found".to_string())),
        }
        if self.subjects.find_by_id(subject_id).await?.is_none() {
            return Err(ServiceError::Validation("Subject not found".to_string()));
        }

        AssignmentSlots {
            student_taken: self.assignments.find_by_student(student_id).await?.is_some(),
            subject_taken: self.assignments.find_by_subject(subject_id).await?.is_some(),
        }
        .check()?;

        let assignment = self
            .assignments
            .create(NewAssignment {
                student_id,
                subject_id,
                assigned_by: ctx.user_id,
            })
            .await?;
        info!(assignment_id = %assignment.id, %student_id, %subject_id, "assignment created");
        Ok(assignment)
    }

    /// Choices of the student are left as they are.
    #[tracing::instrument(skip(self, ctx), fields(admin_id = %ctx.user_id))]
    pub async fn delete_assignment(
        &self,
        ctx: &AuthContext,
        assignment_id: AssignmentId,
    ) -> ServiceResult<()> {
        ctx.require_role(&[Role::Admin])?;

        if !self.assignments.delete(assignment_id).await? {
            return Err(not_found("Assignment"));
        }
        info!("assignment deleted");
        Ok(())
    }

    pub async fn list_assignments(
        &self,
        ctx: &AuthContext,
    ) -> ServiceResult<Vec<AssignmentDetail>> {
        ctx.require_role(&[Role::Admin, Role::Observer])?;

        let assignments = self.assignments.list().await?;
        self.with_details(assignments).await
    }

    pub async fn get_own_assignment(&self, ctx: &AuthContext) -> ServiceResult<AssignmentDetail> {
        ctx.require_role(&[Role::Student])?;

        let assignment = self
            .assignments
            .find_by_student(ctx.user_id)
            .await?
            .ok_or_else(|| not_found("Assignment"))?;
        self.with_details(vec![assignment])
            .await?
            .pop()
            .ok_or_else(|| not_found("Assignment"))
    }

    /// Sends the confirmation e-mail to the assigned student. Unlike review
    /// notifications, a delivery failure is the caller's error.
    #[tracing::instrument(skip(self, ctx), fields(admin_id = %ctx.user_id))]
    pub async fn notify_assignment(
        &self,
        ctx: &AuthContext,
        assignment_id: AssignmentId,
    ) -> ServiceResult<()> {
        ctx.require_role(&[Role::Admin])?;

        let assignment = self
            .assignments
            .find_by_id(assignment_id)
            .await?
            .ok_or_else(|| not_found("Assignment"))?;
        let student = self
            .profiles
            .find_by_id(assignment.student_id)
            .await?
            .ok_or_else(|| not_found("Student"))?;
        let subject = self
            .subjects
            .find_by_id(assignment.subject_id)
            .await?
            .ok_or_else(|| not_found("Subject"))?;

        let recipient = EmailAddress::parse(&student.email)?;
        let template = Template::AssignmentConfirmed {
            student_name: student.display_name(),
            subject_title: subject.title,
            supervisor_name: subject.main_supervisor_name,
            platform_url: format!("{}/app", self.platform_url.trim_end_matches('/')),
        };

        self.notifier
            .send(template.render(recipient))
            .await
            .map_err(|err| anyhow!("failed to send assignment notification: {err}"))?;
        info!(student_id = %student.id, "assignment notification sent");
        Ok(())
    }

    async fn with_details(
        &self,
        assignments: Vec<AssignmentRecord>,
    ) -> ServiceResult<Vec<AssignmentDetail>> {
        let mut user_ids: Vec<UserId> = assignments
            .iter()
            .flat_map(|a| [a.student_id, a.assigned_by])
            .collect();
        user_ids.sort();
        user_ids.dedup();
        let mut subject_ids: Vec<SubjectId> = assignments.iter().map(|a| a.subject_id).collect();
        subject_ids.sort();
        subject_ids.dedup();

        let profiles: HashMap<_, _> = self
            .profiles
            .find_many(&user_ids)
            .await?
            .into_iter()
            .map(|profile| (profile.id, profile))
            .collect();
        let subjects: HashMap<_, _> = self
            .subjects
            .find_many(&subject_ids)
            .await?
            .into_iter()
            .map(|subject| (subject.id, subject))
            .collect();

        let details: Vec<AssignmentDetail> = assignments
            .into_iter()
            .map(|assignment| -> anyhow::Result<AssignmentDetail> {
                let student = profiles.get(&assignment.student_id).cloned().ok_or_else(|| {
                    anyhow!("assignment {} has no student profile", assignment.id)
                })?;
                let subject = subjects
                    .get(&assignment.subject_id)
                    .cloned()
                    .ok_or_else(|| anyhow!("assignment {} has no subject", assignment.id))?;
                let assigned_by = profiles.get(&assignment.assigned_by).cloned();
                Ok(AssignmentDetail {
                    assignment,
                    student,
                    subject,
                    assigned_by,
                })
            })
            .collect::<anyhow::Result<_>>()?;
        Ok(details)
    }
}
