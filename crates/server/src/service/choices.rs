use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use internship_core::domain::{AuthContext, DomainError, Role, SubjectId, UserId};
use tracing::{debug, info};

use super::{ServiceResult, not_found};
use crate::repository::{
    ChoiceRecord, ChoiceRepository, ProfileRecord, ProfileRepository, StoreError, SubjectRecord,
    SubjectRepository,
};

/// Writes that lose a race against another request of the same student are
/// retried against fresh ranks this many times in total.
const ADD_CHOICE_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct ChoiceDetail {
    pub choice: ChoiceRecord,
    pub student: ProfileRecord,
    pub subject: SubjectRecord,
}

/// A student's ranked preferences, at most three.
#[derive(Clone)]
pub struct ChoiceRanker {
    choices: Arc<dyn ChoiceRepository>,
    subjects: Arc<dyn SubjectRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl ChoiceRanker {
    pub fn new(
        choices: Arc<dyn ChoiceRepository>,
        subjects: Arc<dyn SubjectRepository>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            choices,
            subjects,
            profiles,
        }
    }

    #[tracing::instrument(skip(self, ctx), fields(student_id = %ctx.user_id))]
    pub async fn add_choice(
        &self,
        ctx: &AuthContext,
        subject_id: SubjectId,
    ) -> ServiceResult<ChoiceRecord> {
        ctx.require_role(&[Role::Student])?;

        let subject = self
            .subjects
            .find_by_id(subject_id)
            .await?
            .ok_or(DomainError::SubjectNotAvailable)?;

        let mut attempt = 1;
        loop {
            match self
                .choices
                .append(ctx.user_id, subject_id, subject.status)
                .await
            {
                Ok(choice) => {
                    info!(rank = choice.rank, "choice added");
                    return Ok(choice);
                }
                Err(StoreError::Conflict(detail)) if attempt < ADD_CHOICE_ATTEMPTS => {
                    debug!(attempt, %detail, "choice insert raced, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Returns the remaining choices, renumbered from 1.
    #[tracing::instrument(skip(self, ctx), fields(student_id = %ctx.user_id))]
    pub async fn remove_choice(
        &self,
        ctx: &AuthContext,
        subject_id: SubjectId,
    ) -> ServiceResult<Vec<ChoiceRecord>> {
        ctx.require_role(&[Role::Student])?;

        let remaining = self
            .choices
            .remove(ctx.user_id, subject_id)
            .await?
            .ok_or_else(|| not_found("Choice"))?;
        info!(remaining = remaining.len(), "choice removed");
        Ok(remaining)
    }

    pub async fn list_choices(&self, ctx: &AuthContext) -> ServiceResult<Vec<ChoiceRecord>> {
        ctx.require_role(&[Role::Student])?;
        Ok(self.choices.list_by_student(ctx.user_id).await?)
    }

    /// Every student's choices with who chose what, most recent first.
    pub async fn list_all_choices(&self, ctx: &AuthContext) -> ServiceResult<Vec<ChoiceDetail>> {
        ctx.require_role(&[Role::Admin])?;

        let choices = self.choices.list_all().await?;

        let mut student_ids: Vec<UserId> = choices.iter().map(|c| c.student_id).collect();
        student_ids.sort();
        student_ids.dedup();
        let mut subject_ids: Vec<SubjectId> = choices.iter().map(|c| c.subject_id).collect();
        subject_ids.sort();
        subject_ids.dedup();

        let students: HashMap<_, _> = self
            .profiles
            .find_many(&student_ids)
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

        let details: Vec<ChoiceDetail> = choices
            .into_iter()
            .map(|choice| -> anyhow::Result<ChoiceDetail> {
                let student = students
                    .get(&choice.student_id)
                    .cloned()
                    .ok_or_else(|| anyhow!("choice {} has no student profile", choice.id))?;
                let subject = subjects
                    .get(&choice.subject_id)
                    .cloned()
                    .ok_or_else(|| anyhow!("choice {} has no subject", choice.id))?;
                Ok(ChoiceDetail {
                    choice,
                    student,
                    subject,
                })
            })
            .collect::<anyhow::Result<_>>()?;
        Ok(details)
    }
}
