//! Object storage for subject documents.
//!
//! Paths are `{bucket}/{object}`; the first segment selects the bucket.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object storage is not configured")]
    NotConfigured,
    #[error("object storage request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("object storage rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes a new object; existing objects are never overwritten.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<(), StorageError>;

    async fn signed_url(&self, path: &str, ttl_secs: u32) -> Result<String, StorageError>;
}

/// Supabase storage REST API.
pub struct SupabaseObjectStore {
    client: reqwest::Client,
    base_url: String,
    service_key: Option<String>,
}

#[derive(Serialize)]
struct SignRequest {
    #[serde(rename = "expiresIn")]
    expires_in: u32,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl SupabaseObjectStore {
    pub fn new(base_url: impl Into<String>, service_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key,
        }
    }

    fn key(&self) -> Result<&str, StorageError> {
        match self.service_key.as_deref() {
            Some(key) if !self.base_url.is_empty() => Ok(key),
            _ => Err(StorageError::NotConfigured),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(StorageError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ObjectStore for SupabaseObjectStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let key = self.key()?;
        let response = self
            .client
            .post(format!("{}/storage/v1/object/{path}", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {key}"))
            .header("apikey", key)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn signed_url(&self, path: &str, ttl_secs: u32) -> Result<String, StorageError> {
        let key = self.key()?;
        let response = self
            .client
            .post(format!("{}/storage/v1/object/sign/{path}", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {key}"))
            .header("apikey", key)
            .json(&SignRequest {
                expires_in: ttl_secs,
            })
            .send()
            .await?;

        let signed: SignResponse = Self::check(response).await?.json().await?;
        Ok(format!("{}/storage/v1{}", self.base_url, signed.signed_url))
    }
}
