//! Shared request/response types used by API-facing crates.
//!
//! Roles and statuses travel as lower snake_case strings
//! (`"student"`, `"needs_modification"`, ...). Timestamps are RFC 3339.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
}

impl HealthCheckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

// --- profiles ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

/// Name fields only: the role is deliberately absent from this payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileListResponse {
    pub users: Vec<ProfileResponse>,
}

// --- subjects ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectPayload {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub pdf_url: Option<String>,
    pub team_info: String,
    pub main_supervisor_name: String,
    pub main_supervisor_email: String,
    #[serde(default)]
    pub co_supervisors_names: String,
    #[serde(default)]
    pub co_supervisors_emails: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSubjectRequest {
    pub id: String,
    #[serde(flatten)]
    pub fields: SubjectPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSubjectRequest {
    pub status: String,
    #[serde(default)]
    pub admin_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub pdf_url: Option<String>,
    pub team_info: String,
    pub main_supervisor_name: String,
    pub main_supervisor_email: String,
    pub co_supervisors_names: String,
    pub co_supervisors_emails: String,
    pub co_supervisors: Vec<String>,
    pub status: String,
    pub admin_comment: Option<String>,
    pub supervisor_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectListResponse {
    pub subjects: Vec<SubjectResponse>,
}

// --- choices ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddChoiceRequest {
    pub subject_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceResponse {
    pub id: String,
    pub student_id: String,
    pub subject_id: String,
    pub choice_rank: u8,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceListResponse {
    pub choices: Vec<ChoiceResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub title: String,
    pub main_supervisor_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminChoiceResponse {
    #[serde(flatten)]
    pub choice: ChoiceResponse,
    pub student: PersonSummary,
    pub subject: SubjectSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminChoiceListResponse {
    pub choices: Vec<AdminChoiceResponse>,
}

// --- assignments ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAssignmentRequest {
    pub student_id: String,
    pub subject_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResponse {
    pub id: String,
    pub student_id: String,
    pub subject_id: String,
    pub assigned_by: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDetailResponse {
    #[serde(flatten)]
    pub assignment: AssignmentResponse,
    pub student: PersonSummary,
    pub subject: SubjectSummary,
    pub assigned_by_profile: Option<PersonSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentListResponse {
    pub assignments: Vec<AssignmentDetailResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub success: bool,
    pub message: String,
}

// --- files ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrlResponse {
    pub url: String,
}
