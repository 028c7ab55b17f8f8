use std::env;
use std::path::Path;

use anyhow::{Context, anyhow};
use serde::Deserialize;
use tracing::info;

type Result<T> = anyhow::Result<T>;

pub const CONFIG_PATH_ENV: &str = "INTERNSHIP_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "internship.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl ServerConfig {
    /// Loads the file named by `INTERNSHIP_CONFIG`, or `internship.toml` when
    /// present, then applies secrets from the environment.
    pub fn load() -> Result<Self> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => {
                info!("{DEFAULT_CONFIG_PATH} not found, using default configuration");
                Self::default()
            }
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize server config")
    }

    /// Secrets never live in the file.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(secret) = lookup("SESSION_JWT_SECRET") {
            self.session.jwt_secret = Some(secret);
        }
        if let Some(key) = lookup("STORAGE_SERVICE_KEY") {
            self.storage.service_key = Some(key);
        }
        if let Some(key) = lookup("RESEND_API_KEY") {
            self.notifications.resend_api_key = Some(key);
        }
    }

    pub fn database_url(&self) -> Result<&str> {
        self.database
            .url
            .as_deref()
            .ok_or_else(|| anyhow!("DATABASE_URL is not set"))
    }

    pub fn jwt_secret(&self) -> Result<&str> {
        self.session
            .jwt_secret
            .as_deref()
            .ok_or_else(|| anyhow!("SESSION_JWT_SECRET is not set"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Base URL of the web application, used in e-mail links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            request_timeout_secs: default_request_timeout_secs(),
            public_url: default_public_url(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Expected `aud` claim; audience is not checked when unset.
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(skip)]
    pub jwt_secret: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            audience: None,
            jwt_secret: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_signed_url_ttl_secs")]
    pub default_signed_url_ttl_secs: u32,
    #[serde(skip)]
    pub service_key: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            bucket: default_bucket(),
            max_upload_bytes: default_max_upload_bytes(),
            default_signed_url_ttl_secs: default_signed_url_ttl_secs(),
            service_key: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationProvider {
    #[default]
    Log,
    Resend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub provider: NotificationProvider,
    #[serde(default = "default_from_address")]
    pub from: String,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default = "default_resend_api_url")]
    pub resend_api_url: String,
    #[serde(default = "default_notification_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(skip)]
    pub resend_api_key: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            provider: NotificationProvider::default(),
            from: default_from_address(),
            reply_to: None,
            resend_api_url: default_resend_api_url(),
            timeout_secs: default_notification_timeout_secs(),
            resend_api_key: None,
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_public_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_cookie_name() -> String {
    "sb-access-token".to_string()
}

fn default_bucket() -> String {
    "subject-pdfs".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_signed_url_ttl_secs() -> u32 {
    300
}

fn default_from_address() -> String {
    "Internship Platform <noreply@localhost>".to_string()
}

fn default_resend_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_notification_timeout_secs() -> u64 {
    10
}
