//! Subject document upload and signed download links.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
};
use internship_api_types::{SignedUrlResponse, UploadResponse};
use serde::Deserialize;
use std::sync::Arc;

use super::{
    error::ApiError,
    extract::{ApiQuery, Caller},
    state::AppState,
};

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_file_router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/files/upload",
            post(upload_file).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
            )),
        )
        .route("/api/files/signed-url", get(signed_url))
}

/// Reads the `file` field of the form.
async fn upload_file(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        let path = state
            .files
            .upload_subject_pdf(
                &ctx,
                filename.as_deref(),
                content_type.as_deref(),
                bytes.to_vec(),
            )
            .await?;
        return Ok(Json(UploadResponse { path }));
    }

    Err(ApiError::validation("No file provided"))
}

#[derive(Debug, Deserialize)]
struct SignedUrlQuery {
    path: String,
    #[serde(rename = "expiresIn")]
    expires_in: Option<i64>,
}

async fn signed_url(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    ApiQuery(query): ApiQuery<SignedUrlQuery>,
) -> Result<Json<SignedUrlResponse>, ApiError> {
    let url = state
        .files
        .signed_url(&ctx, &query.path, query.expires_in)
        .await?;
    Ok(Json(SignedUrlResponse { url }))
}
