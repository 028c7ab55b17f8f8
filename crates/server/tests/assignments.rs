mod common;

use common::{TestApp, subject_fields, tick};
use internship_core::domain::{AssignmentId, NotificationKind, Role};
use internship_server::service::ServiceError;

#[tokio::test]
async fn test_student_and_subject_are_each_assigned_once() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let student = app.user(Role::Student).await;
    let other_student = app.user(Role::Student).await;
    let subject = app.validated_subject(&supervisor, &admin, "Compilers").await;
    let other_subject = app.validated_subject(&supervisor, &admin, "Databases").await;
    let allocator = &app.state.assignments;

    let assignment = allocator
        .create_assignment(&admin, student.user_id, subject.id)
        .await
        .expect("first assignment");
    assert_eq!(assignment.assigned_by, admin.user_id);

    let err = allocator
        .create_assignment(&admin, student.user_id, other_subject.id)
        .await
        .expect_err("student already placed");
    assert!(
        matches!(err, ServiceError::Validation(ref m) if m == "Student already has an assignment")
    );

    let err = allocator
        .create_assignment(&admin, other_student.user_id, subject.id)
        .await
        .expect_err("subject already given");
    assert!(
        matches!(err, ServiceError::Validation(ref m) if m == "Subject is already assigned to another student")
    );

    let err = allocator
        .create_assignment(&admin, student.user_id, subject.id)
        .await
        .expect_err("both taken");
    assert!(
        matches!(err, ServiceError::Validation(ref m) if m == "Student already has an assignment")
    );
}

#[tokio::test]
async fn test_concurrent_assignment_of_one_subject() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let first = app.user(Role::Student).await;
    let second = app.user(Role::Student).await;
    let subject = app.validated_subject(&supervisor, &admin, "Compilers").await;
    let allocator = &app.state.assignments;

    let (a, b) = tokio::join!(
        allocator.create_assignment(&admin, first.user_id, subject.id),
        allocator.create_assignment(&admin, second.user_id, subject.id)
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let err = outcomes
        .into_iter()
        .find_map(Result::err)
        .expect("one attempt fails");
    assert!(matches!(
        err,
        ServiceError::Conflict(_) | ServiceError::Validation(_)
    ));

    let listed = allocator.list_assignments(&admin).await.expect("list");
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_referenced_student_and_subject_must_exist() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let student = app.user(Role::Student).await;
    let subject = app.validated_subject(&supervisor, &admin, "Compilers").await;
    let allocator = &app.state.assignments;

    let err = allocator
        .create_assignment(&admin, supervisor.user_id, subject.id)
        .await
        .expect_err("only students");
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = allocator
        .create_assignment(
            &admin,
            student.user_id,
            internship_core::domain::SubjectId::new(),
        )
        .await
        .expect_err("unknown subject");
    assert!(matches!(err, ServiceError::Validation(ref m) if m == "Subject not found"));
}

#[tokio::test]
async fn test_only_admins_allocate() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let observer = app.user(Role::Observer).await;
    let student = app.user(Role::Student).await;
    let subject = app.validated_subject(&supervisor, &admin, "Compilers").await;

    let err = app
        .state
        .assignments
        .create_assignment(&observer, student.user_id, subject.id)
        .await
        .expect_err("observers only read");
    assert!(matches!(err, ServiceError::Forbidden(_)));

    assert!(app.state.assignments.list_assignments(&observer).await.is_ok());
    let err = app
        .state
        .assignments
        .list_assignments(&student)
        .await
        .expect_err("students read their own");
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_delete_frees_both_sides_and_keeps_choices() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let student = app.user(Role::Student).await;
    let other_student = app.user(Role::Student).await;
    let subject = app.validated_subject(&supervisor, &admin, "Compilers").await;
    app.state
        .choices
        .add_choice(&student, subject.id)
        .await
        .expect("add choice");

    let assignment = app
        .state
        .assignments
        .create_assignment(&admin, student.user_id, subject.id)
        .await
        .expect("assign");
    app.state
        .assignments
        .delete_assignment(&admin, assignment.id)
        .await
        .expect("delete");

    let err = app
        .state
        .assignments
        .delete_assignment(&admin, assignment.id)
        .await
        .expect_err("already gone");
    assert!(matches!(err, ServiceError::NotFound(_)));

    assert_eq!(
        app.state.choices.list_choices(&student).await.expect("list").len(),
        1
    );
    app.state
        .assignments
        .create_assignment(&admin, other_student.user_id, subject.id)
        .await
        .expect("subject is free again");
}

#[tokio::test]
async fn test_listing_joins_people_and_subject() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let student = app.user(Role::Student).await;
    let subject = app.validated_subject(&supervisor, &admin, "Compilers").await;
    app.state
        .assignments
        .create_assignment(&admin, student.user_id, subject.id)
        .await
        .expect("assign");

    let listed = app
        .state
        .assignments
        .list_assignments(&admin)
        .await
        .expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].student.id, student.user_id);
    assert_eq!(listed[0].subject.title, "Compilers");
    assert_eq!(
        listed[0].assigned_by.as_ref().map(|p| p.id),
        Some(admin.user_id)
    );

    let own = app
        .state
        .assignments
        .get_own_assignment(&student)
        .await
        .expect("student sees own assignment");
    assert_eq!(own.subject.id, subject.id);
}

#[tokio::test]
async fn test_notify_assignment_sends_confirmation() {
    let mut app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let student = app.user(Role::Student).await;
    let subject = app
        .state
        .subjects
        .create_subject(&supervisor, subject_fields("Compilers"))
        .await
        .expect("create");
    let assignment = app
        .state
        .assignments
        .create_assignment(&admin, student.user_id, subject.id)
        .await
        .expect("assign");

    app.state
        .assignments
        .notify_assignment(&admin, assignment.id)
        .await
        .expect("sent");

    let sent = app.sent.try_recv().expect("one notification recorded");
    assert_eq!(sent.kind, NotificationKind::AssignmentConfirmed);
    assert_eq!(sent.recipient.as_str(), student.email);
    assert!(sent.body.contains("Internship subject: Compilers"));
    assert!(sent.body.contains("https://stages.example/app"));

    let err = app
        .state
        .assignments
        .notify_assignment(&admin, AssignmentId::new())
        .await
        .expect_err("unknown assignment");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_notify_assignment_reports_delivery_failure() {
    let app = TestApp::spawn_with_failing_notifier().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;
    let student = app.user(Role::Student).await;
    let subject = app
        .state
        .subjects
        .create_subject(&supervisor, subject_fields("Compilers"))
        .await
        .expect("create");
    let assignment = app
        .state
        .assignments
        .create_assignment(&admin, student.user_id, subject.id)
        .await
        .expect("assign");

    let err = app
        .state
        .assignments
        .notify_assignment(&admin, assignment.id)
        .await
        .expect_err("provider down");
    assert!(matches!(err, ServiceError::Internal(_)));
}

#[tokio::test]
async fn test_assignments_are_listed_most_recent_first() {
    let app = TestApp::spawn().await;
    let supervisor = app.user(Role::Supervisor).await;
    let admin = app.user(Role::Admin).await;

    let mut students = Vec::new();
    for title in ["Compilers", "Databases", "Networks"] {
        let student = app.user(Role::Student).await;
        let subject = app.validated_subject(&supervisor, &admin, title).await;
        app.state
            .assignments
            .create_assignment(&admin, student.user_id, subject.id)
            .await
            .expect("assign");
        students.push(student.user_id);
        tick().await;
    }

    let listed = app
        .state
        .assignments
        .list_assignments(&admin)
        .await
        .expect("list");
    let order: Vec<_> = listed.iter().map(|d| d.student.id).collect();
    students.reverse();
    assert_eq!(order, students);
}
