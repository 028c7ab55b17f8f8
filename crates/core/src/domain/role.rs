use std::fmt;
use std::str::FromStr;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Supervisor,
    Admin,
    Observer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::Supervisor, Role::Admin, Role::Observer];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Supervisor => "supervisor",
            Role::Admin => "admin",
            Role::Observer => "observer",
        }
    }

    /// Roles a user may pick for themselves when setting up a profile.
    pub fn is_self_selectable(self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DomainError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_from_wire_names() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "Admin".parse::<Role>().expect_err("role names are case sensitive");
        assert_eq!(err, DomainError::UnknownRole("Admin".to_string()));
    }

    #[test]
    fn admin_is_never_self_selectable() {
        assert!(!Role::Admin.is_self_selectable());
        assert!(Role::Student.is_self_selectable());
        assert!(Role::Supervisor.is_self_selectable());
        assert!(Role::Observer.is_self_selectable());
    }
}
