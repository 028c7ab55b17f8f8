use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    // Identity provider subject, not generated here.
                    .col(string_len(Profile::Id, 36).primary_key())
                    .col(string_len(Profile::Email, 255))
                    .col(string_len_null(Profile::FirstName, 100))
                    .col(string_len_null(Profile::LastName, 100))
                    // Role enum is represented in app code.
                    // 0=student, 1=supervisor, 2=admin, 3=observer
                    .col(
                        small_integer(Profile::Role)
                            .check(Expr::col(Profile::Role).gte(0))
                            .check(Expr::col(Profile::Role).lte(3)),
                    )
                    .col(timestamp(Profile::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Profile::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subject::Table)
                    .if_not_exists()
                    .col(string_len(Subject::Id, 36).primary_key())
                    .col(string_len(Subject::Title, 255))
                    .col(text(Subject::Description))
                    .col(text_null(Subject::PdfUrl))
                    .col(text(Subject::TeamInfo))
                    .col(string_len(Subject::MainSupervisorName, 200))
                    .col(string_len(Subject::MainSupervisorEmail, 255))
                    .col(text(Subject::CoSupervisorsNames))
                    .col(text(Subject::CoSupervisorsEmails))
                    // SubjectStatus enum is represented in app code.
                    // 0=pending, 1=validated, 2=needs_modification, 3=refused
                    .col(
                        small_integer(Subject::Status)
                            .default(0)
                            .check(Expr::col(Subject::Status).gte(0))
                            .check(Expr::col(Subject::Status).lte(3)),
                    )
                    .col(text_null(Subject::AdminComment))
                    .col(string_len(Subject::SupervisorId, 36))
                    .col(timestamp(Subject::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Subject::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subject-supervisor_id")
                            .from(Subject::Table, Subject::SupervisorId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudentChoice::Table)
                    .if_not_exists()
                    .col(string_len(StudentChoice::Id, 36).primary_key())
                    .col(string_len(StudentChoice::StudentId, 36))
                    .col(string_len(StudentChoice::SubjectId, 36))
                    .col(
                        small_integer(StudentChoice::ChoiceRank)
                            .check(Expr::col(StudentChoice::ChoiceRank).gte(1))
                            .check(Expr::col(StudentChoice::ChoiceRank).lte(3)),
                    )
                    .col(timestamp(StudentChoice::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_choice-student_id")
                            .from(StudentChoice::Table, StudentChoice::StudentId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_choice-subject_id")
                            .from(StudentChoice::Table, StudentChoice::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Assignment::Table)
                    .if_not_exists()
                    .col(string_len(Assignment::Id, 36).primary_key())
                    .col(string_len(Assignment::StudentId, 36).unique_key())
                    .col(string_len(Assignment::SubjectId, 36).unique_key())
                    .col(string_len(Assignment::AssignedBy, 36))
                    .col(timestamp(Assignment::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assignment-student_id")
                            .from(Assignment::Table, Assignment::StudentId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assignment-subject_id")
                            .from(Assignment::Table, Assignment::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assignment-assigned_by")
                            .from(Assignment::Table, Assignment::AssignedBy)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // A student holds each rank at most once and picks each subject at
        // most once. Together with the rank CHECK this caps choices at 3.
        manager
            .create_index(
                Index::create()
                    .name("uq_student_choice_student_rank")
                    .table(StudentChoice::Table)
                    .col(StudentChoice::StudentId)
                    .col(StudentChoice::ChoiceRank)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_student_choice_student_subject")
                    .table(StudentChoice::Table)
                    .col(StudentChoice::StudentId)
                    .col(StudentChoice::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subject_supervisor_id")
                    .table(Subject::Table)
                    .col(Subject::SupervisorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subject_status")
                    .table(Subject::Table)
                    .col(Subject::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subject_created_at")
                    .table(Subject::Table)
                    .col(Subject::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assignment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(StudentChoice::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subject::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Profile {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subject {
    Table,
    Id,
    Title,
    Description,
    PdfUrl,
    TeamInfo,
    MainSupervisorName,
    MainSupervisorEmail,
    CoSupervisorsNames,
    CoSupervisorsEmails,
    Status,
    AdminComment,
    SupervisorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentChoice {
    Table,
    Id,
    StudentId,
    SubjectId,
    ChoiceRank,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Assignment {
    Table,
    Id,
    StudentId,
    SubjectId,
    AssignedBy,
    CreatedAt,
}
