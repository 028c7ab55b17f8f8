use super::subject::ensure_max_chars;
use super::{DomainError, Role};

pub const NAME_PART_MAX_CHARS: usize = 100;

/// First and last name of a profile, both mandatory once set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    first: String,
    last: String,
}

impl PersonName {
    pub fn new(first: impl AsRef<str>, last: impl AsRef<str>) -> Result<Self, DomainError> {
        let first = first.as_ref().trim();
        let last = last.as_ref().trim();

        if first.is_empty() {
            return Err(DomainError::EmptyField("first_name"));
        }
        if last.is_empty() {
            return Err(DomainError::EmptyField("last_name"));
        }
        ensure_max_chars("first_name", first, NAME_PART_MAX_CHARS)?;
        ensure_max_chars("last_name", last, NAME_PART_MAX_CHARS)?;

        Ok(Self {
            first: first.to_string(),
            last: last.to_string(),
        })
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn last(&self) -> &str {
        &self.last
    }
}

/// Name shown in e-mails, falling back to the address before setup is done.
pub fn display_name(first: Option<&str>, last: Option<&str>, email: &str) -> String {
    let joined = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        email.to_string()
    } else {
        joined
    }
}

/// Role a user picked for their own profile.
pub fn self_selected_role(role: Role) -> Result<Role, DomainError> {
    if role.is_self_selectable() {
        Ok(role)
    } else {
        Err(DomainError::AdminRoleNotSelectable)
    }
}
