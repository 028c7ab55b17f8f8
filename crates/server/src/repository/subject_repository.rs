use super::{StoreResult, map_status, map_status_code, now};
use crate::entity::subject;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use internship_core::domain::{SubjectDraft, SubjectId, SubjectStatus, UserId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct SubjectRecord {
    pub id: SubjectId,
    pub title: String,
    pub description: String,
    pub pdf_url: Option<String>,
    pub team_info: String,
    pub main_supervisor_name: String,
    pub main_supervisor_email: String,
    pub co_supervisors_names: String,
    pub co_supervisors_emails: String,
    pub status: SubjectStatus,
    pub admin_comment: Option<String>,
    pub supervisor_id: UserId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectFilter {
    All,
    Status(SubjectStatus),
    Supervisor(UserId),
}

#[async_trait]
pub trait SubjectRepository: Send + Sync {
    async fn create(&self, supervisor_id: UserId, draft: SubjectDraft) -> StoreResult<SubjectRecord>;
    async fn find_by_id(&self, subject_id: SubjectId) -> StoreResult<Option<SubjectRecord>>;
    async fn find_many(&self, subject_ids: &[SubjectId]) -> StoreResult<Vec<SubjectRecord>>;
    /// Most recent first.
    async fn list(&self, filter: SubjectFilter) -> StoreResult<Vec<SubjectRecord>>;
    async fn update_content(
        &self,
        subject_id: SubjectId,
        draft: SubjectDraft,
        status: SubjectStatus,
    ) -> StoreResult<Option<SubjectRecord>>;
    async fn update_review(
        &self,
        subject_id: SubjectId,
        status: SubjectStatus,
        admin_comment: Option<String>,
    ) -> StoreResult<Option<SubjectRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmSubjectRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: subject::Model) -> anyhow::Result<SubjectRecord> {
        let id = SubjectId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid subject.id '{}' from database: {e}", model.id))?;
        let supervisor_id = UserId::from_str(&model.supervisor_id).map_err(|e| {
            anyhow!(
                "invalid subject.supervisor_id '{}' from database: {e}",
                model.supervisor_id
            )
        })?;

        Ok(SubjectRecord {
            id,
            title: model.title,
            description: model.description,
            pdf_url: model.pdf_url,
            team_info: model.team_info,
            main_supervisor_name: model.main_supervisor_name,
            main_supervisor_email: model.main_supervisor_email,
            co_supervisors_names: model.co_supervisors_names,
            co_supervisors_emails: model.co_supervisors_emails,
            status: map_status(model.status)?,
            admin_comment: model.admin_comment,
            supervisor_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn map_models(models: Vec<subject::Model>) -> anyhow::Result<Vec<SubjectRecord>> {
        models.into_iter().map(Self::map_model).collect()
    }

    fn apply_draft(active_model: &mut subject::ActiveModel, draft: SubjectDraft) {
        active_model.title = Set(draft.title);
        active_model.description = Set(draft.description);
        active_model.pdf_url = Set(draft.pdf_url);
        active_model.team_info = Set(draft.team_info);
        active_model.main_supervisor_name = Set(draft.main_supervisor_name);
        active_model.main_supervisor_email = Set(draft.main_supervisor_email.as_str().to_string());
        active_model.co_supervisors_names = Set(draft.co_supervisors_names);
        active_model.co_supervisors_emails = Set(draft.co_supervisors_emails);
    }
}

#[async_trait]
impl SubjectRepository for SeaOrmSubjectRepository {
    async fn create(&self, supervisor_id: UserId, draft: SubjectDraft) -> StoreResult<SubjectRecord> {
        let id = SubjectId::new();
        let now = now();

        let mut active_model = subject::ActiveModel {
            id: Set(id.to_string()),
            status: Set(map_status_code(SubjectStatus::Pending)),
            admin_comment: Set(None),
            supervisor_id: Set(supervisor_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Self::apply_draft(&mut active_model, draft);

        let model = active_model.insert(&self.db).await?;
        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, subject_id: SubjectId) -> StoreResult<Option<SubjectRecord>> {
        let model = subject::Entity::find_by_id(subject_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn find_many(&self, subject_ids: &[SubjectId]) -> StoreResult<Vec<SubjectRecord>> {
        if subject_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = subject::Entity::find()
            .filter(subject::Column::Id.is_in(subject_ids.iter().map(SubjectId::to_string)))
            .all(&self.db)
            .await?;

        Ok(Self::map_models(models)?)
    }

    async fn list(&self, filter: SubjectFilter) -> StoreResult<Vec<SubjectRecord>> {
        let query = match filter {
            SubjectFilter::All => subject::Entity::find(),
            SubjectFilter::Status(status) => subject::Entity::find()
                .filter(subject::Column::Status.eq(map_status_code(status))),
            SubjectFilter::Supervisor(supervisor_id) => subject::Entity::find()
                .filter(subject::Column::SupervisorId.eq(supervisor_id.to_string())),
        };

        let models = query
            .order_by_desc(subject::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(Self::map_models(models)?)
    }

    async fn update_content(
        &self,
        subject_id: SubjectId,
        draft: SubjectDraft,
        status: SubjectStatus,
    ) -> StoreResult<Option<SubjectRecord>> {
        let Some(model) = subject::Entity::find_by_id(subject_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: subject::ActiveModel = model.into();
        Self::apply_draft(&mut active_model, draft);
        active_model.status = Set(map_status_code(status));
        active_model.updated_at = Set(now());

        let updated = active_model.update(&self.db).await?;
        Ok(Some(Self::map_model(updated)?))
    }

    async fn update_review(
        &self,
        subject_id: SubjectId,
        status: SubjectStatus,
        admin_comment: Option<String>,
    ) -> StoreResult<Option<SubjectRecord>> {
        let Some(model) = subject::Entity::find_by_id(subject_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: subject::ActiveModel = model.into();
        active_model.status = Set(map_status_code(status));
        active_model.admin_comment = Set(admin_comment);
        active_model.updated_at = Set(now());

        let updated = active_model.update(&self.db).await?;
        Ok(Some(Self::map_model(updated)?))
    }
}
