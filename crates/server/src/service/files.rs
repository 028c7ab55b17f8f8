use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use internship_core::domain::{AuthContext, Role};
use tracing::info;

use super::{ServiceError, ServiceResult};
use crate::config::StorageConfig;
use crate::storage::ObjectStore;

const DEFAULT_EXTENSION: &str = "pdf";
const DEFAULT_CONTENT_TYPE: &str = "application/pdf";
const MAX_SIGNED_URL_TTL_SECS: u32 = 3600;

/// Subject documents in object storage.
#[derive(Clone)]
pub struct FileService {
    objects: Arc<dyn ObjectStore>,
    bucket: String,
    max_upload_bytes: usize,
    default_ttl_secs: u32,
}

impl FileService {
    pub fn new(objects: Arc<dyn ObjectStore>, config: &StorageConfig) -> Self {
        Self {
            objects,
            bucket: config.bucket.clone(),
            max_upload_bytes: config.max_upload_bytes,
            default_ttl_secs: config.default_signed_url_ttl_secs,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Stores the document under a fresh `{bucket}/{user}/{millis}.{ext}`
    /// path and returns that path.
    #[tracing::instrument(skip(self, ctx, bytes), fields(user_id = %ctx.user_id, size = bytes.len()))]
    pub async fn upload_subject_pdf(
        &self,
        ctx: &AuthContext,
        filename: Option<&str>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> ServiceResult<String> {
        ctx.require_role(&[Role::Supervisor, Role::Admin])?;

        if bytes.is_empty() {
            return Err(ServiceError::Validation("No file provided".to_string()));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(ServiceError::Validation(format!(
                "File exceeds the maximum size of {} bytes",
                self.max_upload_bytes
            )));
        }

        let path = format!(
            "{}/{}/{}.{}",
            self.bucket,
            ctx.user_id,
            Utc::now().timestamp_millis(),
            extension_of(filename)
        );
        let content_type = content_type
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE);

        self.objects
            .upload(&path, bytes, content_type)
            .await
            .map_err(|err| anyhow!("upload of {path} failed: {err}"))?;
        info!(%path, "document uploaded");
        Ok(path)
    }

    /// `expires_in` defaults to the configured lifetime and is clamped to
    /// one hour.
    pub async fn signed_url(
        &self,
        _ctx: &AuthContext,
        path: &str,
        expires_in: Option<i64>,
    ) -> ServiceResult<String> {
        match path.split_once('/') {
            Some((bucket, object)) if !bucket.is_empty() && !object.is_empty() => {}
            _ => {
                return Err(ServiceError::Validation(
                    "Path must be of the form bucket/object".to_string(),
                ));
            }
        }

        let ttl = expires_in
            .unwrap_or(i64::from(self.default_ttl_secs))
            .clamp(1, i64::from(MAX_SIGNED_URL_TTL_SECS));
        let ttl = u32::try_from(ttl).unwrap_or(MAX_SIGNED_URL_TTL_SECS);

        Ok(self
            .objects
            .signed_url(path, ttl)
            .await
            .map_err(|err| anyhow!("signing {path} failed: {err}"))?)
    }
}

/// Lowercased extension of the uploaded file name, `pdf` when absent.
fn extension_of(filename: Option<&str>) -> String {
    filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
