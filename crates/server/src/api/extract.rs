//! Request extractors resolving the caller once per request, and body/path/query
//! extractors whose rejections answer with the JSON error body.

use std::sync::Arc;

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use internship_core::domain::AuthContext;

use super::{error::ApiError, state::AppState};
use crate::session::{SessionIdentity, session_token};

/// Signed-in user with a profile.
pub struct Caller(pub AuthContext);

impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers, &state.session_cookie);
        let ctx = state.identity.resolve_caller(token.as_deref()).await?;
        Ok(Caller(ctx))
    }
}

/// Signed-in user whose profile may not exist yet.
pub struct Session(pub SessionIdentity);

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers, &state.session_cookie);
        let identity = state.identity.resolve_session(token.as_deref())?;
        Ok(Session(identity))
    }
}

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
