use super::DomainError;

/// Column widths of the subject and profile tables.
pub const TITLE_MAX_CHARS: usize = 255;
pub const PERSON_NAME_MAX_CHARS: usize = 200;
pub const EMAIL_MAX_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(value: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = value.as_ref().trim();
        let invalid = || DomainError::InvalidEmail(trimmed.to_string());
        ensure_max_chars("email", trimmed, EMAIL_MAX_CHARS)?;

        let (local, domain) = trimmed.split_once('@').ok_or_else(invalid)?;
        if local.is_empty()
            || domain.contains('@')
            || trimmed.chars().any(char::is_whitespace)
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
        {
            return Err(invalid());
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Splits a free-text multi-value field such as `co_supervisors_names`.
///
/// Entries may be separated by `,` or `;`; blanks are dropped.
pub fn split_multi_value(value: &str) -> Vec<String> {
    value
        .split([',', ';'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw subject content as submitted by a supervisor or administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectFields {
    pub title: String,
    pub description: String,
    pub pdf_url: Option<String>,
    pub team_info: String,
    pub main_supervisor_name: String,
    pub main_supervisor_email: String,
    pub co_supervisors_names: String,
    pub co_supervisors_emails: String,
}

/// Subject content that passed validation and may be written as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDraft {
    pub title: String,
    pub description: String,
    pub pdf_url: Option<String>,
    pub team_info: String,
    pub main_supervisor_name: String,
    pub main_supervisor_email: EmailAddress,
    pub co_supervisors_names: String,
    pub co_supervisors_emails: String,
}

impl SubjectDraft {
    pub fn new(fields: SubjectFields) -> Result<Self, DomainError> {
        let title = required("title", fields.title)?;
        ensure_max_chars("title", &title, TITLE_MAX_CHARS)?;
        let description = required("description", fields.description)?;
        let team_info = required("team_info", fields.team_info)?;
        let main_supervisor_name = required("main_supervisor_name", fields.main_supervisor_name)?;
        ensure_max_chars(
            "main_supervisor_name",
            &main_supervisor_name,
            PERSON_NAME_MAX_CHARS,
        )?;
        let main_supervisor_email = EmailAddress::parse(required(
            "main_supervisor_email",
            fields.main_supervisor_email,
        )?)?;

        for email in split_multi_value(&fields.co_supervisors_emails) {
            EmailAddress::parse(email)?;
        }

        Ok(Self {
            title,
            description,
            pdf_url: fields
                .pdf_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            team_info,
            main_supervisor_name,
            main_supervisor_email,
            co_supervisors_names: fields.co_supervisors_names.trim().to_string(),
            co_supervisors_emails: fields.co_supervisors_emails.trim().to_string(),
        })
    }
}

pub(crate) fn ensure_max_chars(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::TooLong(field, max));
    }
    Ok(())
}

fn required(field: &'static str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> SubjectFields {
        SubjectFields {
            title: "  Static analysis of smart contracts ".to_string(),
            description: "Build a checker.".to_string(),
            pdf_url: Some(String::new()),
            team_info: "DiverSE team".to_string(),
            main_supervisor_name: "Ada Martin".to_string(),
            main_supervisor_email: "ada.martin@univ.example".to_string(),
            co_supervisors_names: "Bob; Chloe".to_string(),
            co_supervisors_emails: "bob@univ.example, chloe@lab.example".to_string(),
        }
    }

    #[test]
    fn valid_fields_are_trimmed() {
        let draft = SubjectDraft::new(fields()).expect("fields are valid");
        assert_eq!(draft.title, "Static analysis of smart contracts");
        assert_eq!(draft.main_supervisor_email.as_str(), "ada.martin@univ.example");
        assert_eq!(draft.pdf_url, None);
    }

    #[test]
    fn missing_required_field_is_reported_by_name() {
        let mut input = fields();
        input.team_info = "   ".to_string();
        let err = SubjectDraft::new(input).expect_err("team info required");
        assert_eq!(err, DomainError::EmptyField("team_info"));
    }

    #[test]
    fn malformed_supervisor_email_is_rejected() {
        let mut input = fields();
        input.main_supervisor_email = "ada.martin".to_string();
        let err = SubjectDraft::new(input).expect_err("email must be valid");
        assert_eq!(err, DomainError::InvalidEmail("ada.martin".to_string()));
    }

    #[test]
    fn malformed_co_supervisor_email_is_rejected() {
        let mut input = fields();
        input.co_supervisors_emails = "bob@univ.example; chloe@".to_string();
        assert!(matches!(
            SubjectDraft::new(input),
            Err(DomainError::InvalidEmail(email)) if email == "chloe@"
        ));
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let mut input = fields();
        input.title = "t".repeat(TITLE_MAX_CHARS + 1);
        assert_eq!(
            SubjectDraft::new(input),
            Err(DomainError::TooLong("title", TITLE_MAX_CHARS))
        );

        let mut input = fields();
        input.main_supervisor_name = "é".repeat(PERSON_NAME_MAX_CHARS + 1);
        assert_eq!(
            SubjectDraft::new(input),
            Err(DomainError::TooLong("main_supervisor_name", PERSON_NAME_MAX_CHARS))
        );

        let mut input = fields();
        input.title = "é".repeat(TITLE_MAX_CHARS);
        assert!(SubjectDraft::new(input).is_ok());

        let long_email = format!("{}@univ.example", "a".repeat(EMAIL_MAX_CHARS));
        assert_eq!(
            EmailAddress::parse(long_email),
            Err(DomainError::TooLong("email", EMAIL_MAX_CHARS))
        );
    }

    #[test]
    fn multi_value_fields_split_on_both_delimiters() {
        assert_eq!(
            split_multi_value("Bob, Chloe ;; Dan "),
            vec!["Bob".to_string(), "Chloe".to_string(), "Dan".to_string()]
        );
        assert!(split_multi_value("  ").is_empty());
    }

    #[test]
    fn email_parsing_rejects_obvious_garbage() {
        for bad in ["", "@x.org", "a@b", "a@@b.org", "a b@c.org", "a@.org"] {
            assert!(EmailAddress::parse(bad).is_err(), "{bad} should be rejected");
        }
        assert!(EmailAddress::parse("first.last+tag@sub.univ.fr").is_ok());
    }
}
