use std::sync::Arc;

use internship_core::domain::AuthContext;
use tracing::debug;

use super::{ServiceError, ServiceResult};
use crate::repository::ProfileRepository;
use crate::session::{SessionIdentity, SessionVerifier};

/// Turns a session credential into the caller of a request.
#[derive(Clone)]
pub struct IdentityResolver {
    sessions: Arc<dyn SessionVerifier>,
    profiles: Arc<dyn ProfileRepository>,
}

impl IdentityResolver {
    pub fn new(sessions: Arc<dyn SessionVerifier>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { sessions, profiles }
    }

    /// Valid session, profile not required. Used by profile setup.
    pub fn resolve_session(&self, token: Option<&str>) -> ServiceResult<SessionIdentity> {
        let token = token.ok_or(ServiceError::Unauthenticated)?;
        self.sessions.verify(token).map_err(|err| {
            debug!(error = %err, "session rejected");
            ServiceError::Unauthenticated
        })
    }

    pub async fn resolve_caller(&self, token: Option<&str>) -> ServiceResult<AuthContext> {
        let identity = self.resolve_session(token)?;
        let profile = self
            .profiles
            .find_by_id(identity.user_id)
            .await?
            .ok_or(ServiceError::ProfileMissing)?;

        Ok(profile.auth_context())
    }
}
