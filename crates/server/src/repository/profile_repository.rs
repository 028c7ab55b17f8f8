use super::{StoreResult, map_role, map_role_code, now};
use crate::entity::{assignment, profile, student_choice, subject};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use internship_core::domain::{AuthContext, PersonName, Role, UserId, display_name};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub id: UserId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ProfileRecord {
    pub fn display_name(&self) -> String {
        display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            &self.email,
        )
    }

    pub fn auth_context(&self) -> AuthContext {
        AuthContext::new(self.id, self.email.clone(), self.role)
    }
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: UserId,
    pub email: String,
    pub name: PersonName,
    pub role: Role,
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create(&self, new_profile: NewProfile) -> StoreResult<ProfileRecord>;
    async fn find_by_id(&self, user_id: UserId) -> StoreResult<Option<ProfileRecord>>;
    async fn find_many(&self, user_ids: &[UserId]) -> StoreResult<Vec<ProfileRecord>>;
    async fn list(&self) -> StoreResult<Vec<ProfileRecord>>;
    async fn update_name(
        &self,
        user_id: UserId,
        name: &PersonName,
    ) -> StoreResult<Option<ProfileRecord>>;
    async fn update_role(&self, user_id: UserId, role: Role) -> StoreResult<Option<ProfileRecord>>;
    /// Whether any subject, choice or assignment still points at the profile.
    async fn is_referenced(&self, user_id: UserId) -> StoreResult<bool>;
    async fn delete(&self, user_id: UserId) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct SeaOrmProfileRepository {
    db: DatabaseConnection,
}

impl SeaOrmProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: profile::Model) -> anyhow::Result<ProfileRecord> {
        let id = UserId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid profile.id '{}' from database: {e}", model.id))?;

        Ok(ProfileRecord {
            id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            role: map_role(model.role)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait]
impl ProfileRepository for SeaOrmProfileRepository {
    async fn create(&self, new_profile: NewProfile) -> StoreResult<ProfileRecord> {
        let now = now();
        let active_model = profile::ActiveModel {
            id: Set(new_profile.id.to_string()),
            email: Set(new_profile.email),
            first_name: Set(Some(new_profile.name.first().to_string())),
            last_name: Set(Some(new_profile.name.last().to_string())),
            role: Set(map_role_code(new_profile.role)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, user_id: UserId) -> StoreResult<Option<ProfileRecord>> {
        let model = profile::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn find_many(&self, user_ids: &[UserId]) -> StoreResult<Vec<ProfileRecord>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = profile::Entity::find()
            .filter(profile::Column::Id.is_in(user_ids.iter().map(UserId::to_string)))
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn list(&self) -> StoreResult<Vec<ProfileRecord>> {
        let models = profile::Entity::find()
            .order_by_desc(profile::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update_name(
        &self,
        user_id: UserId,
        name: &PersonName,
    ) -> StoreResult<Option<ProfileRecord>> {
        let Some(model) = profile::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: profile::ActiveModel = model.into();
        active_model.first_name = Set(Some(name.first().to_string()));
        active_model.last_name = Set(Some(name.last().to_string()));
        active_model.updated_at = Set(now());

        let updated = active_model.update(&self.db).await?;
        Ok(Some(Self::map_model(updated)?))
    }

    async fn update_role(&self, user_id: UserId, role: Role) -> StoreResult<Option<ProfileRecord>> {
        let Some(model) = profile::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: profile::ActiveModel = model.into();
        active_model.role = Set(map_role_code(role));
        active_model.updated_at = Set(now());

        let updated = active_model.update(&self.db).await?;
        Ok(Some(Self::map_model(updated)?))
    }

    async fn is_referenced(&self, user_id: UserId) -> StoreResult<bool> {
        let id = user_id.to_string();

        let subjects = subject::Entity::find()
            .filter(subject::Column::SupervisorId.eq(id.as_str()))
            .count(&self.db)
            .await?;
        let choices = student_choice::Entity::find()
            .filter(student_choice::Column::StudentId.eq(id.as_str()))
            .count(&self.db)
            .await?;
        let assignments = assignment::Entity::find()
            .filter(
                Condition::any()
                    .add(assignment::Column::StudentId.eq(id.as_str()))
                    .add(assignment::Column::AssignedBy.eq(id.as_str())),
            )
            .count(&self.db)
            .await?;

        Ok(subjects + choices + assignments > 0)
    }

    async fn delete(&self, user_id: UserId) -> StoreResult<bool> {
        let result = profile::Entity::delete_by_id(user_id.to_string())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
