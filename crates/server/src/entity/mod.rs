pub mod assignment;
pub mod profile;
pub mod student_choice;
pub mod subject;
