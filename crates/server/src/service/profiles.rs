use std::str::FromStr;
use std::sync::Arc;

use internship_core::domain::{
    AuthContext, EmailAddress, PersonName, Role, UserId, self_selected_role,
};
use tracing::info;

use super::{ServiceError, ServiceResult, not_found};
use crate::repository::{NewProfile, ProfileRecord, ProfileRepository};
use crate::session::SessionIdentity;

#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    #[tracing::instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn setup_profile(
        &self,
        identity: &SessionIdentity,
        first_name: &str,
        last_name: &str,
        role: &str,
    ) -> ServiceResult<ProfileRecord> {
        let role = self_selected_role(Role::from_str(role)?)?;
        let name = PersonName::new(first_name, last_name)?;
        let email = EmailAddress::parse(&identity.email)?;

        if self.profiles.find_by_id(identity.user_id).await?.is_some() {
            return Err(ServiceError::Conflict("Profile already exists".to_string()));
        }

        let profile = self
            .profiles
            .create(NewProfile {
                id: identity.user_id,
                email: email.as_str().to_string(),
                name,
                role,
            })
            .await?;

        info!(role = %profile.role, "profile created");
        Ok(profile)
    }

    pub async fn get_own_profile(&self, ctx: &AuthContext) -> ServiceResult<ProfileRecord> {
        self.profiles
            .find_by_id(ctx.user_id)
            .await?
            .ok_or(ServiceError::ProfileMissing)
    }

    /// Names only; the role never changes through this path.
    pub async fn update_profile(
        &self,
        ctx: &AuthContext,
        first_name: &str,
        last_name: &str,
    ) -> ServiceResult<ProfileRecord> {
        let name = PersonName::new(first_name, last_name)?;
        self.profiles
            .update_name(ctx.user_id, &name)
            .await?
            .ok_or(ServiceError::ProfileMissing)
    }

    pub async fn list_profiles(&self, ctx: &AuthContext) -> ServiceResult<Vec<ProfileRecord>> {
        ctx.require_role(&[Role::Admin])?;
        Ok(self.profiles.list().await?)
    }

    #[tracing::instrument(skip(self, ctx), fields(admin_id = %ctx.user_id))]
    pub async fn change_role(
        &self,
        ctx: &AuthContext,
        user_id: UserId,
        role: &str,
    ) -> ServiceResult<ProfileRecord> {
        ctx.require_role(&[Role::Admin])?;
        let role = Role::from_str(role)?;

        if user_id == ctx.user_id {
            return Err(ServiceError::Forbidden(
                "Administrators cannot change their own role".to_string(),
            ));
        }

        let profile = self
            .profiles
            .update_role(user_id, role)
            .await?
            .ok_or_else(|| not_found("User"))?;

        info!(%role, "role changed");
        Ok(profile)
    }

    /// Profiles still referenced elsewhere are kept; nothing cascades.
    #[tracing::instrument(skip(self, ctx), fields(admin_id = %ctx.user_id))]
    pub async fn delete_profile(&self, ctx: &AuthContext, user_id: UserId) -> ServiceResult<()> {
        ctx.require_role(&[Role::Admin])?;

        let target = self
            .profiles
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| not_found("User"))?;
        if target.role == Role::Admin {
            return Err(ServiceError::Forbidden(
                "Administrator accounts cannot be deleted".to_string(),
            ));
        }
        if self.profiles.is_referenced(user_id).await? {
            return Err(ServiceError::Conflict(
                "User still has subjects, choices or assignments".to_string(),
            ));
        }

        if !self.profiles.delete(user_id).await? {
            return Err(not_found("User"));
        }
        info!("profile deleted");
        Ok(())
    }
}
