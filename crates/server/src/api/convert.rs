//! Records to wire types.

use chrono::NaiveDateTime;
use internship_api_types::{
    AdminChoiceResponse, AssignmentDetailResponse, AssignmentResponse, ChoiceResponse,
    PersonSummary, ProfileResponse, SubjectResponse, SubjectSummary,
};
use internship_core::domain::split_multi_value;

use crate::repository::{AssignmentRecord, ChoiceRecord, ProfileRecord, SubjectRecord};
use crate::service::{AssignmentDetail, ChoiceDetail};

fn timestamp(value: NaiveDateTime) -> String {
    value.and_utc().to_rfc3339()
}

impl From<ProfileRecord> for ProfileResponse {
    fn from(profile: ProfileRecord) -> Self {
        Self {
            id: profile.id.to_string(),
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            role: profile.role.as_str().to_string(),
            created_at: timestamp(profile.created_at),
        }
    }
}

impl From<&ProfileRecord> for PersonSummary {
    fn from(profile: &ProfileRecord) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
        }
    }
}

impl From<SubjectRecord> for SubjectResponse {
    fn from(subject: SubjectRecord) -> Self {
        Self {
            id: subject.id.to_string(),
            co_supervisors: split_multi_value(&subject.co_supervisors_names),
            title: subject.title,
            description: subject.description,
            pdf_url: subject.pdf_url,
            team_info: subject.team_info,
            main_supervisor_name: subject.main_supervisor_name,
            main_supervisor_email: subject.main_supervisor_email,
            co_supervisors_names: subject.co_supervisors_names,
            co_supervisors_emails: subject.co_supervisors_emails,
            status: subject.status.as_str().to_string(),
            admin_comment: subject.admin_comment,
            supervisor_id: subject.supervisor_id.to_string(),
            created_at: timestamp(subject.created_at),
            updated_at: timestamp(subject.updated_at),
        }
    }
}

impl From<&SubjectRecord> for SubjectSummary {
    fn from(subject: &SubjectRecord) -> Self {
        Self {
            title: subject.title.clone(),
            main_supervisor_name: subject.main_supervisor_name.clone(),
        }
    }
}

impl From<ChoiceRecord> for ChoiceResponse {
    fn from(choice: ChoiceRecord) -> Self {
        Self {
            id: choice.id.to_string(),
            student_id: choice.student_id.to_string(),
            subject_id: choice.subject_id.to_string(),
            choice_rank: choice.rank,
            created_at: timestamp(choice.created_at),
        }
    }
}

impl From<ChoiceDetail> for AdminChoiceResponse {
    fn from(detail: ChoiceDetail) -> Self {
        Self {
            student: PersonSummary::from(&detail.student),
            subject: SubjectSummary::from(&detail.subject),
            choice: detail.choice.into(),
        }
    }
}

impl From<AssignmentRecord> for AssignmentResponse {
    fn from(assignment: AssignmentRecord) -> Self {
        Self {
            id: assignment.id.to_string(),
            student_id: assignment.student_id.to_string(),
            subject_id: assignment.subject_id.to_string(),
            assigned_by: assignment.assigned_by.to_string(),
            created_at: timestamp(assignment.created_at),
        }
    }
}

impl From<AssignmentDetail> for AssignmentDetailResponse {
    fn from(detail: AssignmentDetail) -> Self {
        Self {
            student: PersonSummary::from(&detail.student),
            subject: SubjectSummary::from(&detail.subject),
            assigned_by_profile: detail.assigned_by.as_ref().map(PersonSummary::from),
            assignment: detail.assignment.into(),
        }
    }
}
