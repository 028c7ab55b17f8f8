#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use internship_core::domain::{
    AuthContext, Notification, NotificationDispatcher, NotificationError, PersonName, Role,
    SubjectFields, UserId,
};
use internship_server::{
    api::{self, AppState, Collaborators},
    config::ServerConfig,
    repository::{
        NewProfile, ProfileRepository, SeaOrmProfileRepository, SubjectRecord,
    },
    session::JwtSessionVerifier,
    storage::{ObjectStore, StorageError},
};
use internship_migration::{Migrator, MigratorTrait};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::Serialize;
use tokio::sync::mpsc;

pub const JWT_SECRET: &str = "integration-secret";
pub const MAX_UPLOAD_BYTES: usize = 1024;

/// Collects every notification handed to it.
pub struct RecordingDispatcher {
    tx: mpsc::UnboundedSender<Notification>,
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, notification: Notification) -> Result<(), NotificationError> {
        let _ = self.tx.send(notification);
        Ok(())
    }
}

pub struct FailingDispatcher;

#[async_trait]
impl NotificationDispatcher for FailingDispatcher {
    fn name(&self) -> &str {
        "failing"
    }

    async fn send(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Unavailable("provider down".to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl InMemoryObjectStore {
    pub fn get(&self, path: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().expect("lock").get(path).cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let mut objects = self.objects.lock().expect("lock");
        if objects.contains_key(path) {
            return Err(StorageError::Rejected {
                status: 409,
                message: "The resource already exists".to_string(),
            });
        }
        objects.insert(path.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    async fn signed_url(&self, path: &str, ttl_secs: u32) -> Result<String, StorageError> {
        Ok(format!("https://storage.test/{path}?expires_in={ttl_secs}"))
    }
}

pub struct TestApp {
    pub db: DatabaseConnection,
    pub config: ServerConfig,
    pub state: Arc<AppState>,
    pub objects: Arc<InMemoryObjectStore>,
    pub sent: mpsc::UnboundedReceiver<Notification>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self::build(Arc::new(RecordingDispatcher { tx }), rx).await
    }

    pub async fn spawn_with_failing_notifier() -> Self {
        let (_tx, rx) = mpsc::unbounded_channel();
        Self::build(Arc::new(FailingDispatcher), rx).await
    }

    async fn build(
        notifier: Arc<dyn NotificationDispatcher>,
        sent: mpsc::UnboundedReceiver<Notification>,
    ) -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options)
            .await
            .expect("connect to in-memory sqlite");
        Migrator::up(&db, None).await.expect("run migrations");

        let mut config = ServerConfig::default();
        config.server.public_url = "https://stages.example".to_string();
        config.storage.max_upload_bytes = MAX_UPLOAD_BYTES;

        let objects = Arc::new(InMemoryObjectStore::default());
        let collaborators = Collaborators {
            sessions: Arc::new(JwtSessionVerifier::new(JWT_SECRET, None)),
            notifier,
            objects: objects.clone(),
        };
        let state = Arc::new(AppState::new(db.clone(), &config, collaborators));

        Self {
            db,
            config,
            state,
            objects,
            sent,
        }
    }

    pub fn router(&self) -> Router {
        api::create_router(self.state.clone(), &self.config.server)
    }

    /// Creates a profile with the given role and returns its caller context.
    pub async fn user(&self, role: Role) -> AuthContext {
        let id = UserId::new();
        let profile = SeaOrmProfileRepository::new(self.db.clone())
            .create(NewProfile {
                id,
                email: format!("{}-{id}@univ.example", role.as_str()),
                name: PersonName::new("Test", role.as_str()).expect("valid name"),
                role,
            })
            .await
            .expect("seed profile");
        profile.auth_context()
    }

    /// A subject submitted by `supervisor` and validated by `admin`.
    pub async fn validated_subject(
        &self,
        supervisor: &AuthContext,
        admin: &AuthContext,
        title: &str,
    ) -> SubjectRecord {
        let subject = self
            .state
            .subjects
            .create_subject(supervisor, subject_fields(title))
            .await
            .expect("create subject");
        self.state
            .subjects
            .review_subject(admin, subject.id, "validated", None)
            .await
            .expect("validate subject")
    }
}

/// Lets the clock move so consecutive rows get distinct `created_at` values.
pub async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

pub fn subject_fields(title: &str) -> SubjectFields {
    SubjectFields {
        title: title.to_string(),
        description: "Design and build it.".to_string(),
        pdf_url: None,
        team_info: "Systems team".to_string(),
        main_supervisor_name: "Ada Martin".to_string(),
        main_supervisor_email: "ada.martin@univ.example".to_string(),
        co_supervisors_names: "Grace Hopper; Alan Turing".to_string(),
        co_supervisors_emails: "grace@univ.example, alan@univ.example".to_string(),
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    sub: String,
    email: &'a str,
    exp: i64,
}

pub fn token_for(user_id: UserId, email: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        email,
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("encode session token")
}
