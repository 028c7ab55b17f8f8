//! Shared application state.

use std::sync::Arc;

use internship_core::domain::NotificationDispatcher;
use sea_orm::DatabaseConnection;

use crate::config::ServerConfig;
use crate::repository::{
    SeaOrmAssignmentRepository, SeaOrmChoiceRepository, SeaOrmProfileRepository,
    SeaOrmSubjectRepository,
};
use crate::service::{
    AssignmentAllocator, ChoiceRanker, FileService, IdentityResolver, ProfileService,
    SubjectLifecycle,
};
use crate::session::SessionVerifier;
use crate::storage::ObjectStore;

/// Services reaching outside the process, chosen at startup.
#[derive(Clone)]
pub struct Collaborators {
    pub sessions: Arc<dyn SessionVerifier>,
    pub notifier: Arc<dyn NotificationDispatcher>,
    pub objects: Arc<dyn ObjectStore>,
}

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub identity: IdentityResolver,
    pub profiles: ProfileService,
    pub subjects: SubjectLifecycle,
    pub choices: ChoiceRanker,
    pub assignments: AssignmentAllocator,
    pub files: FileService,
    /// Cookie carrying the session token when no bearer header is sent.
    pub session_cookie: String,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &ServerConfig, collaborators: Collaborators) -> Self {
        let profile_repo = Arc::new(SeaOrmProfileRepository::new(db.clone()));
        let subject_repo = Arc::new(SeaOrmSubjectRepository::new(db.clone()));
        let choice_repo = Arc::new(SeaOrmChoiceRepository::new(db.clone()));
        let assignment_repo = Arc::new(SeaOrmAssignmentRepository::new(db));

        Self {
            identity: IdentityResolver::new(collaborators.sessions, profile_repo.clone()),
            profiles: ProfileService::new(profile_repo.clone()),
            subjects: SubjectLifecycle::new(subject_repo.clone(), collaborators.notifier.clone()),
            choices: ChoiceRanker::new(choice_repo, subject_repo.clone(), profile_repo.clone()),
            assignments: AssignmentAllocator::new(
                assignment_repo,
                profile_repo,
                subject_repo,
                collaborators.notifier,
                config.server.public_url.clone(),
            ),
            files: FileService::new(collaborators.objects, &config.storage),
            session_cookie: config.session.cookie_name.clone(),
        }
    }
}
