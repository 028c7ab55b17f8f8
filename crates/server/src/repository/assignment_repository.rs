use super::{StoreResult, now};
use crate::entity::assignment;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use internship_core::domain::{AssignmentId, SubjectId, UserId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AssignmentRecord {
    pub id: AssignmentId,
    pub student_id: UserId,
    pub subject_id: SubjectId,
    pub assigned_by: UserId,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy)]
pub struct NewAssignment {
    pub student_id: UserId,
    pub subject_id: SubjectId,
    pub assigned_by: UserId,
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create(&self, new_assignment: NewAssignment) -> StoreResult<AssignmentRecord>;
    async fn find_by_id(&self, assignment_id: AssignmentId)
    -> StoreResult<Option<AssignmentRecord>>;
    async fn find_by_student(&self, student_id: UserId) -> StoreResult<Option<AssignmentRecord>>;
    async fn find_by_subject(&self, subject_id: SubjectId)
    -> StoreResult<Option<AssignmentRecord>>;
    /// Most recent first.
    async fn list(&self) -> StoreResult<Vec<AssignmentRecord>>;
    async fn delete(&self, assignment_id: AssignmentId) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct SeaOrmAssignmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmAssignmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: assignment::Model) -> anyhow::Result<AssignmentRecord> {
        let parse_user = |column: &str, value: &str| {
            UserId::from_str(value)
                .map_err(|e| anyhow!("invalid assignment.{column} '{value}' from database: {e}"))
        };

        let id = AssignmentId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid assignment.id '{}' from database: {e}", model.id))?;
        let subject_id = SubjectId::from_str(&model.subject_id).map_err(|e| {
            anyhow!(
                "invalid assignment.subject_id '{}' from database: {e}",
                model.subject_id
            )
        })?;

        Ok(AssignmentRecord {
            id,
            student_id: parse_user("student_id", &model.student_id)?,
            subject_id,
            assigned_by: parse_user("assigned_by", &model.assigned_by)?,
            created_at: model.created_at,
        })
    }

    async fn find_one(
        &self,
        column: assignment::Column,
        value: String,
    ) -> StoreResult<Option<AssignmentRecord>> {
        let model = assignment::Entity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }
}

#[async_trait]
impl AssignmentRepository for SeaOrmAssignmentRepository {
    async fn create(&self, new_assignment: NewAssignment) -> StoreResult<AssignmentRecord> {
        let active_model = assignment::ActiveModel {
            id: Set(AssignmentId::new().to_string()),
            student_id: Set(new_assignment.student_id.to_string()),
            subject_id: Set(new_assignment.subject_id.to_string()),
            assigned_by: Set(new_assignment.assigned_by.to_string()),
            created_at: Set(now()),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(
        &self,
        assignment_id: AssignmentId,
    ) -> StoreResult<Option<AssignmentRecord>> {
        self.find_one(assignment::Column::Id, assignment_id.to_string())
            .await
    }

    async fn find_by_student(&self, student_id: UserId) -> StoreResult<Option<AssignmentRecord>> {
        self.find_one(assignment::Column::StudentId, student_id.to_string())
            .await
    }

    async fn find_by_subject(
        &self,
        subject_id: SubjectId,
    ) -> StoreResult<Option<AssignmentRecord>> {
        self.find_one(assignment::Column::SubjectId, subject_id.to_string())
            .await
    }

    async fn list(&self) -> StoreResult<Vec<AssignmentRecord>> {
        let models = assignment::Entity::find()
            .order_by_desc(assignment::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn delete(&self, assignment_id: AssignmentId) -> StoreResult<bool> {
        let result = assignment::Entity::delete_by_id(assignment_id.to_string())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
