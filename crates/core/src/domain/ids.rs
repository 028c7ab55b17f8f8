use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// A string that is not the uuid of the named kind of record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid {kind} id")]
pub struct InvalidId {
    pub kind: &'static str,
}

/// Uuid-backed key of a stored record. `KIND` names the record in messages.
macro_rules! record_id {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Uuid);

        impl $name {
            pub const KIND: &'static str = $kind;

            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| InvalidId { kind: Self::KIND })
            }
        }
    };
}

record_id!(
    /// Subject of the identity provider's session token; profiles reuse it.
    UserId,
    "user"
);
record_id!(SubjectId, "subject");
record_id!(ChoiceId, "choice");
record_id!(AssignmentId, "assignment");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_parses_identity_provider_subject() {
        let parsed: UserId = "0b6f3f0e-8a4e-4f43-9d7c-2b1c5d8e9f10"
            .parse()
            .expect("provider subject should be a uuid");

        assert_eq!(parsed.to_string(), "0b6f3f0e-8a4e-4f43-9d7c-2b1c5d8e9f10");
    }

    #[test]
    fn malformed_id_names_the_record_kind() {
        let err = "subject-42".parse::<SubjectId>().expect_err("not a uuid");
        assert_eq!(err, InvalidId { kind: "subject" });
        assert_eq!(err.to_string(), "Invalid subject id");

        let err = "".parse::<AssignmentId>().expect_err("empty");
        assert_eq!(err.to_string(), "Invalid assignment id");
    }

    #[test]
    fn ids_order_consistently_for_deduplication() {
        let mut ids = vec![ChoiceId::new(), ChoiceId::new()];
        ids.push(ids[0]);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 2);
    }
}
