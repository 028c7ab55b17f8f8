//! HTTP routes.
//!
//! Handlers resolve the caller through [`extract::Caller`] and delegate to the
//! services held in [`AppState`].

pub mod assignments;
pub mod choices;
mod convert;
pub mod error;
pub mod extract;
pub mod files;
pub mod profile;
pub mod state;
pub mod subjects;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use internship_api_types::HealthCheckResponse;
use internship_core::domain::InvalidId;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::warn;

use crate::config::HttpConfig;

pub use error::ApiError;
pub use state::{AppState, Collaborators};

/// All routes with request tracing, the request timeout and CORS applied.
pub fn create_router(state: Arc<AppState>, http: &HttpConfig) -> Router {
    let max_upload_bytes = state.files.max_upload_bytes();

    Router::new()
        .route("/api/health", get(health))
        .merge(profile::create_profile_router())
        .merge(subjects::create_subject_router())
        .merge(choices::create_choice_router())
        .merge(assignments::create_assignment_router())
        .merge(files::create_file_router(max_upload_bytes))
        .with_state(state)
        .layer(cors_layer(&http.allowed_origins))
        .layer(TimeoutLayer::new(Duration::from_secs(
            http.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%origin, error = %err, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

fn parse_id<T: FromStr<Err = InvalidId>>(raw: &str) -> Result<T, ApiError> {
    T::from_str(raw).map_err(|err| ApiError::validation(err.to_string()))
}
