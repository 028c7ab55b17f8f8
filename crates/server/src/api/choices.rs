//! Student choice ranking.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get},
};
use internship_api_types::{
    AddChoiceRequest, AdminChoiceListResponse, ChoiceListResponse, ChoiceResponse,
};
use internship_core::domain::SubjectId;
use std::sync::Arc;

use super::{
    error::ApiError,
    extract::{ApiJson, ApiPath, Caller},
    parse_id,
    state::AppState,
};
use crate::repository::ChoiceRecord;

pub fn create_choice_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/choices", get(list_choices).post(add_choice))
        .route("/api/choices/{subject_id}", delete(remove_choice))
        .route("/api/admin/choices", get(list_all_choices))
}

fn list_response(choices: Vec<ChoiceRecord>) -> Json<ChoiceListResponse> {
    Json(ChoiceListResponse {
        choices: choices.into_iter().map(Into::into).collect(),
    })
}

async fn list_choices(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
) -> Result<Json<ChoiceListResponse>, ApiError> {
    Ok(list_response(state.choices.list_choices(&ctx).await?))
}

async fn add_choice(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiJson(request): ApiJson<AddChoiceRequest>,
) -> Result<(StatusCode, Json<ChoiceResponse>), ApiError> {
    let subject_id: SubjectId = parse_id(&request.subject_id)?;
    let choice = state.choices.add_choice(&ctx, subject_id).await?;
    Ok((StatusCode::CREATED, Json(choice.into())))
}

/// Answers with the renumbered remaining choices.
async fn remove_choice(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiPath(subject_id): ApiPath<String>,
) -> Result<Json<ChoiceListResponse>, ApiError> {
    let subject_id: SubjectId = parse_id(&subject_id)?;
    Ok(list_response(
        state.choices.remove_choice(&ctx, subject_id).await?,
    ))
}

async fn list_all_choices(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
) -> Result<Json<AdminChoiceListResponse>, ApiError> {
    let choices = state.choices.list_all_choices(&ctx).await?;
    Ok(Json(AdminChoiceListResponse {
        choices: choices.into_iter().map(Into::into).collect(),
    }))
}
