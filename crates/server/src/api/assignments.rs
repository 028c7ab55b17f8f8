//! Student/subject assignments.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};
use internship_api_types::{
    AssignmentDetailResponse, AssignmentListResponse, AssignmentResponse,
    CreateAssignmentRequest, NotificationResponse,
};
use internship_core::domain::{AssignmentId, SubjectId, UserId};
use std::sync::Arc;

use super::{
    error::ApiError,
    extract::{ApiJson, ApiPath, Caller},
    parse_id,
    state::AppState,
};

pub fn create_assignment_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/assignments",
            get(list_assignments).post(create_assignment),
        )
        .route("/api/assignments/me", get(get_own_assignment))
        .route("/api/assignments/{id}", delete(delete_assignment))
        .route("/api/assignments/{id}/notify", post(notify_assignment))
}

async fn list_assignments(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
) -> Result<Json<AssignmentListResponse>, ApiError> {
    let assignments = state.assignments.list_assignments(&ctx).await?;
    Ok(Json(AssignmentListResponse {
        assignments: assignments.into_iter().map(Into::into).collect(),
    }))
}

async fn create_assignment(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiJson(request): ApiJson<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentResponse>), ApiError> {
    let student_id: UserId = parse_id(&request.student_id)?;
    let subject_id: SubjectId = parse_id(&request.subject_id)?;
    let assignment = state
        .assignments
        .create_assignment(&ctx, student_id, subject_id)
        .await?;
    Ok((StatusCode::CREATED, Json(assignment.into())))
}

async fn get_own_assignment(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
) -> Result<Json<AssignmentDetailResponse>, ApiError> {
    let assignment = state.assignments.get_own_assignment(&ctx).await?;
    Ok(Json(assignment.into()))
}

async fn delete_assignment(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    let assignment_id: AssignmentId = parse_id(&id)?;
    state
        .assignments
        .delete_assignment(&ctx, assignment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn notify_assignment(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let assignment_id: AssignmentId = parse_id(&id)?;
    state
        .assignments
        .notify_assignment(&ctx, assignment_id)
        .await?;
    Ok(Json(NotificationResponse {
        success: true,
        message: "Notification sent".to_string(),
    }))
}
