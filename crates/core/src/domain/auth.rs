use super::{DomainError, Role, UserId};

/// The caller of a request, resolved once from the session and the profile
/// store and handed to every domain operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: UserId, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
        }
    }

    pub fn require_role(&self, allowed: &[Role]) -> Result<(), DomainError> {
        require_role(self.role, allowed)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owners and administrators may edit; everybody else is turned away.
    pub fn require_owner_or_admin(&self, owner_id: UserId) -> Result<(), DomainError> {
        if self.user_id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::NotSubjectOwner)
        }
    }
}

pub fn require_role(role: Role, allowed: &[Role]) -> Result<(), DomainError> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(DomainError::RoleNotAllowed { role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> AuthContext {
        AuthContext::new(UserId::new(), "someone@univ.example", role)
    }

    #[test]
    fn allowed_role_passes() {
        assert!(
            ctx(Role::Supervisor)
                .require_role(&[Role::Supervisor, Role::Admin])
                .is_ok()
        );
    }

    #[test]
    fn other_roles_are_forbidden() {
        let err = ctx(Role::Observer)
            .require_role(&[Role::Admin])
            .expect_err("observer is read only");
        assert_eq!(
            err,
            DomainError::RoleNotAllowed {
                role: Role::Observer
            }
        );
    }

    #[test]
    fn owner_or_admin_may_edit() {
        let owner = ctx(Role::Supervisor);
        assert!(owner.require_owner_or_admin(owner.user_id).is_ok());
        assert!(ctx(Role::Admin).require_owner_or_admin(owner.user_id).is_ok());

        let err = ctx(Role::Supervisor)
            .require_owner_or_admin(owner.user_id)
            .expect_err("someone else's subject");
        assert_eq!(err, DomainError::NotSubjectOwner);
    }
}
