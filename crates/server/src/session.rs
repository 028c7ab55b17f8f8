//! Session credentials issued by the external identity provider.

use std::str::FromStr;

use axum::http::{HeaderMap, header};
use internship_core::domain::UserId;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("session subject is not a user id: {0}")]
    InvalidSubject(String),
    #[error("session carries no e-mail address")]
    MissingEmail,
}

pub trait SessionVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<SessionIdentity, SessionError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// HS256 access tokens signed with the provider's shared secret.
pub struct JwtSessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtSessionVerifier {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl SessionVerifier for JwtSessionVerifier {
    fn verify(&self, token: &str) -> Result<SessionIdentity, SessionError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        let user_id = UserId::from_str(&data.claims.sub)
            .map_err(|_| SessionError::InvalidSubject(data.claims.sub.clone()))?;
        let email = data
            .claims
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or(SessionError::MissingEmail)?;

        Ok(SessionIdentity { user_id, email })
    }
}

/// Bearer token first, then the named session cookie.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    const SECRET: &str = "test-secret";

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        email: Option<&'a str>,
        aud: &'a str,
        exp: i64,
    }

    fn token(sub: &str, email: Option<&str>, exp_offset: i64) -> String {
        let claims = TestClaims {
            sub,
            email,
            aud: "authenticated",
            exp: chrono::Utc::now().timestamp() + exp_offset,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encode token")
    }

    #[test]
    fn valid_token_yields_identity() {
        let user_id = UserId::new();
        let verifier = JwtSessionVerifier::new(SECRET, Some("authenticated"));

        let identity = verifier
            .verify(&token(&user_id.to_string(), Some("lea@univ.example"), 3600))
            .expect("valid token");

        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.email, "lea@univ.example");
    }

    #[test]
    fn expired_or_foreign_tokens_are_rejected() {
        let user_id = UserId::new().to_string();
        let verifier = JwtSessionVerifier::new(SECRET, None);

        assert!(matches!(
            verifier.verify(&token(&user_id, Some("a@b.fr"), -3600)),
            Err(SessionError::InvalidToken(_))
        ));

        let other = JwtSessionVerifier::new("another-secret", None);
        assert!(other.verify(&token(&user_id, Some("a@b.fr"), 3600)).is_err());
    }

    #[test]
    fn subject_and_email_are_required() {
        let verifier = JwtSessionVerifier::new(SECRET, None);

        assert!(matches!(
            verifier.verify(&token("not-a-uuid", Some("a@b.fr"), 3600)),
            Err(SessionError::InvalidSubject(_))
        ));
        assert!(matches!(
            verifier.verify(&token(&UserId::new().to_string(), None, 3600)),
            Err(SessionError::MissingEmail)
        ));
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sb-access-token=xyz"),
        );

        assert_eq!(
            session_token(&headers, "sb-access-token").as_deref(),
            Some("abc")
        );

        headers.remove(header::AUTHORIZATION);
        assert_eq!(
            session_token(&headers, "sb-access-token").as_deref(),
            Some("xyz")
        );
        assert_eq!(session_token(&headers, "session"), None);
    }
}
