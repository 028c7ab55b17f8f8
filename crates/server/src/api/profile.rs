//! Profile setup, self-service and user administration.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use internship_api_types::{
    ChangeRoleRequest, ProfileListResponse, ProfileResponse, SetupProfileRequest,
    UpdateProfileRequest,
};
use internship_core::domain::UserId;
use std::sync::Arc;

use super::{
    error::ApiError,
    extract::{ApiJson, ApiPath, Caller, Session},
    parse_id,
    state::AppState,
};

pub fn create_profile_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_own_profile))
        .route("/api/profile/setup", post(setup_profile))
        .route("/api/profile/update", post(update_profile))
        .route("/api/admin/users", get(list_profiles))
        .route("/api/admin/users/{id}", delete(delete_profile))
        .route("/api/admin/users/{id}/role", put(change_role))
}

async fn setup_profile(
    State(state): State<Arc<AppState>>,
    Session(identity): Session,
    ApiJson(request): ApiJson<SetupProfileRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    let profile = state
        .profiles
        .setup_profile(
            &identity,
            &request.first_name,
            &request.last_name,
            &request.role,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

async fn get_own_profile(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.profiles.get_own_profile(&ctx).await?;
    Ok(Json(profile.into()))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state
        .profiles
        .update_profile(&ctx, &request.first_name, &request.last_name)
        .await?;
    Ok(Json(profile.into()))
}

async fn list_profiles(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
) -> Result<Json<ProfileListResponse>, ApiError> {
    let users = state.profiles.list_profiles(&ctx).await?;
    Ok(Json(ProfileListResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

async fn change_role(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<String>,
    ApiJson(request): ApiJson<ChangeRoleRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user_id: UserId = parse_id(&id)?;
    let profile = state
        .profiles
        .change_role(&ctx, user_id, &request.role)
        .await?;
    Ok(Json(profile.into()))
}

async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    let user_id: UserId = parse_id(&id)?;
    state.profiles.delete_profile(&ctx, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
