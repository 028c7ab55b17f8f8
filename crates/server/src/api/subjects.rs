//! Subject submission, review and browsing.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use internship_api_types::{
    ReviewSubjectRequest, SubjectListResponse, SubjectPayload, SubjectResponse,
    UpdateSubjectRequest,
};
use internship_core::domain::{SubjectFields, SubjectId};
use std::sync::Arc;

use super::{
    error::ApiError,
    extract::{ApiJson, ApiPath, Caller},
    parse_id,
    state::AppState,
};
use crate::repository::SubjectRecord;

pub fn create_subject_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/subjects", get(list_subjects))
        .route("/api/subjects/validated", get(list_validated_subjects))
        .route("/api/subjects/create", post(create_subject))
        .route("/api/subjects/update", post(update_subject))
        .route("/api/subjects/{id}", get(get_subject))
        .route("/api/subjects/{id}/review", post(review_subject))
}

fn fields_from(payload: SubjectPayload) -> SubjectFields {
    SubjectFields {
        title: payload.title,
        description: payload.description,
        pdf_url: payload.pdf_url,
        team_info: payload.team_info,
        main_supervisor_name: payload.main_supervisor_name,
        main_supervisor_email: payload.main_supervisor_email,
        co_supervisors_names: payload.co_supervisors_names,
        co_supervisors_emails: payload.co_supervisors_emails,
    }
}

fn list_response(subjects: Vec<SubjectRecord>) -> Json<SubjectListResponse> {
    Json(SubjectListResponse {
        subjects: subjects.into_iter().map(Into::into).collect(),
    })
}

async fn list_subjects(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
) -> Result<Json<SubjectListResponse>, ApiError> {
    Ok(list_response(state.subjects.list_subjects(&ctx).await?))
}

async fn list_validated_subjects(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
) -> Result<Json<SubjectListResponse>, ApiError> {
    Ok(list_response(
        state.subjects.list_validated_subjects(&ctx).await?,
    ))
}

async fn get_subject(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<SubjectResponse>, ApiError> {
    let subject_id: SubjectId = parse_id(&id)?;
    let subject = state.subjects.get_subject(&ctx, subject_id).await?;
    Ok(Json(subject.into()))
}

async fn create_subject(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiJson(payload): ApiJson<SubjectPayload>,
) -> Result<(StatusCode, Json<SubjectResponse>), ApiError> {
    let subject = state
        .subjects
        .create_subject(&ctx, fields_from(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(subject.into())))
}

async fn update_subject(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiJson(request): ApiJson<UpdateSubjectRequest>,
) -> Result<Json<SubjectResponse>, ApiError> {
    let subject_id: SubjectId = parse_id(&request.id)?;
    let subject = state
        .subjects
        .update_subject(&ctx, subject_id, fields_from(request.fields))
        .await?;
    Ok(Json(subject.into()))
}

async fn review_subject(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<String>,
    ApiJson(request): ApiJson<ReviewSubjectRequest>,
) -> Result<Json<SubjectResponse>, ApiError> {
    let subject_id: SubjectId = parse_id(&id)?;
    let subject = state
        .subjects
        .review_subject(
            &ctx,
            subject_id,
            &request.status,
            request.admin_comment.as_deref(),
        )
        .await?;
    Ok(Json(subject.into()))
}
