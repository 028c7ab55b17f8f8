mod common;

use std::time::Duration;

use common::{TestApp, subject_fields, tick};
use internship_core::domain::{NotificationKind, Role, SubjectStatus, TITLE_MAX_CHARS};
use internship_server::service::ServiceError;

#[tokio::test]
async fn test_created_subject_starts_pending() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;

    let subject = app
        .state
        .subjects
        .create_subject(&supervisor, subject_fields("Compilers"))
        .await
        .expect("supervisor may submit");

    assert_eq!(subject.status, SubjectStatus::Pending);
    assert_eq!(subject.supervisor_id, supervisor.user_id);
    assert_eq!(subject.admin_comment, None);
}

#[tokio::test]
async fn test_students_and_observers_cannot_submit() {
    let app = TestApp::spawn().await;

    for role in [Role::Student, Role::Observer] {
        let caller = app.user(role).await;
        let err = app
            .state
            .subjects
            .create_subject(&caller, subject_fields("Nope"))
            .await
            .expect_err("only supervisors and admins submit");
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}

#[tokio::test]
async fn test_missing_fields_and_bad_emails_are_rejected() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;

    let mut fields = subject_fields("Compilers");
    fields.team_info = "  ".to_string();
    let err = app
        .state
        .subjects
        .create_subject(&supervisor, fields)
        .await
        .expect_err("team info is required");
    assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("team_info")));

    let mut fields = subject_fields("Compilers");
    fields.co_supervisors_emails = "grace@univ.example; not-an-email".to_string();
    let err = app
        .state
        .subjects
        .create_subject(&supervisor, fields)
        .await
        .expect_err("co-supervisor e-mail must be valid");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_review_requires_comment_for_refusal() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let subject = app
        .state
        .subjects
        .create_subject(&supervisor, subject_fields("Compilers"))
        .await
        .expect("create");

    let err = app
        .state
        .subjects
        .review_subject(&admin, subject.id, "refused", Some("   "))
        .await
        .expect_err("refusal needs a reason");
    assert!(matches!(err, ServiceError::Validation(_)));

    let validated = app
        .state
        .subjects
        .review_subject(&admin, subject.id, "validated", Some(""))
        .await
        .expect("validation needs no comment");
    assert_eq!(validated.status, SubjectStatus::Validated);
    assert_eq!(validated.admin_comment, None);

    let refused = app
        .state
        .subjects
        .review_subject(&admin, subject.id, "refused", Some("needs more detail"))
        .await
        .expect("refusal with reason");
    assert_eq!(refused.status, SubjectStatus::Refused);
    assert_eq!(refused.admin_comment.as_deref(), Some("needs more detail"));
}

#[tokio::test]
async fn test_only_admins_review() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let subject = app
        .state
        .subjects
        .create_subject(&supervisor, subject_fields("Compilers"))
        .await
        .expect("create");

    let err = app
        .state
        .subjects
        .review_subject(&supervisor, subject.id, "validated", None)
        .await
        .expect_err("supervisors cannot approve their own subject");
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_owner_edit_resets_validated_subject_to_pending() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let subject = app.validated_subject(&supervisor, &admin, "Compilers").await;

    let updated = app
        .state
        .subjects
        .update_subject(&supervisor, subject.id, subject_fields("Compilers, 2nd edition"))
        .await
        .expect("owner may edit");

    assert_eq!(updated.title, "Compilers, 2nd edition");
    assert_eq!(updated.status, SubjectStatus::Pending);
}

#[tokio::test]
async fn test_other_supervisor_is_forbidden_but_admin_keeps_status() {
    let app = TestApp::spawn().await;
    let owner = app.user(Role::Supervisor).await;
    let other = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let subject = app.validated_subject(&owner, &admin, "Compilers").await;

    let err = app
        .state
        .subjects
        .update_subject(&other, subject.id, subject_fields("Hijacked"))
        .await
        .expect_err("not the owner");
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let updated = app
        .state
        .subjects
        .update_subject(&admin, subject.id, subject_fields("Compilers (typo fixed)"))
        .await
        .expect("admin may edit");
    assert_eq!(updated.status, SubjectStatus::Validated);
    assert_eq!(updated.supervisor_id, owner.user_id);
}

#[tokio::test]
async fn test_update_of_unknown_subject_is_not_found() {
    let app = TestApp::spawn().await;
    let admin = app.user(Role::Admin).await;

    let err = app
        .state
        .subjects
        .update_subject(
            &admin,
            internship_core::domain::SubjectId::new(),
            subject_fields("Ghost"),
        )
        .await
        .expect_err("no such subject");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_review_notifies_main_supervisor() {
    let mut app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let subject = app
        .state
        .subjects
        .create_subject(&supervisor, subject_fields("Compilers"))
        .await
        .expect("create");

    app.state
        .subjects
        .review_subject(&admin, subject.id, "needs_modification", Some("Add a schedule"))
        .await
        .expect("review");

    let sent = tokio::time::timeout(Duration::from_secs(2), app.sent.recv())
        .await
        .expect("notification in time")
        .expect("channel open");
    assert_eq!(sent.kind, NotificationKind::SubjectReviewed);
    assert_eq!(sent.recipient.as_str(), "ada.martin@univ.example");
    assert!(sent.body.contains("Add a schedule"));
}

#[tokio::test]
async fn test_notification_failure_does_not_undo_review() {
    let app = TestApp::spawn_with_failing_notifier().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let subject = app
        .state
        .subjects
        .create_subject(&supervisor, subject_fields("Compilers"))
        .await
        .expect("create");

    let reviewed = app
        .state
        .subjects
        .review_subject(&admin, subject.id, "validated", None)
        .await
        .expect("review succeeds regardless of e-mail");
    tokio::task::yield_now().await;

    let stored = app
        .state
        .subjects
        .get_subject(&admin, subject.id)
        .await
        .expect("still there");
    assert_eq!(reviewed.status, SubjectStatus::Validated);
    assert_eq!(stored.status, SubjectStatus::Validated);
}

#[tokio::test]
async fn test_listing_depends_on_role() {
    let app = TestApp::spawn().await;
    let owner = app.user(Role::Supervisor).await;
    let other = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let student = app.user(Role::Student).await;
    let observer = app.user(Role::Observer).await;

    let validated = app.validated_subject(&owner, &admin, "Validated").await;
    let pending = app
        .state
        .subjects
        .create_subject(&owner, subject_fields("Pending"))
        .await
        .expect("create");
    app.state
        .subjects
        .create_subject(&other, subject_fields("Someone else's"))
        .await
        .expect("create");

    let subjects = &app.state.subjects;
    assert_eq!(subjects.list_subjects(&admin).await.expect("admin").len(), 3);
    assert_eq!(subjects.list_subjects(&observer).await.expect("observer").len(), 3);
    assert_eq!(subjects.list_subjects(&owner).await.expect("owner").len(), 2);

    let for_student = subjects.list_subjects(&student).await.expect("student");
    assert_eq!(for_student.len(), 1);
    assert_eq!(for_student[0].id, validated.id);

    let browsable = subjects
        .list_validated_subjects(&observer)
        .await
        .expect("validated list");
    assert_eq!(browsable.len(), 1);

    let err = subjects
        .get_subject(&student, pending.id)
        .await
        .expect_err("students only see validated subjects");
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(subjects.get_subject(&owner, pending.id).await.is_ok());
}

#[tokio::test]
async fn test_validated_subjects_are_most_recent_first() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;

    let mut created = Vec::new();
    for title in ["Compilers", "Databases", "Networks"] {
        created.push(app.validated_subject(&supervisor, &admin, title).await);
        tick().await;
    }
    app.state
        .subjects
        .create_subject(&supervisor, subject_fields("Still pending"))
        .await
        .expect("create");

    let listed = app
        .state
        .subjects
        .list_validated_subjects(&admin)
        .await
        .expect("validated list");
    let titles: Vec<&str> = listed.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Networks", "Databases", "Compilers"]);
}

#[tokio::test]
async fn test_overlong_title_is_a_validation_error() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;

    let mut fields = subject_fields("placeholder");
    fields.title = "x".repeat(TITLE_MAX_CHARS + 45);
    let err = app
        .state
        .subjects
        .create_subject(&supervisor, fields)
        .await
        .expect_err("title wider than the column");
    assert!(matches!(err, ServiceError::Validation(_)));
}
