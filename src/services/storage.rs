use async_trait::async_trait;
use axum::body::Bytes;
use once_cell::sync::OnceCell;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{UploadBackend, UploadConfig};
use crate::services::upload::{ImageKind, UploadError, UploadKind};

/// Destination for validated image uploads. Returns the public URL of the stored file.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, kind: UploadKind, image: ImageKind, bytes: Bytes) -> Result<String, UploadError>;
}

/// Build the store selected by `UPLOAD_BACKEND`.
pub fn from_config(config: &UploadConfig) -> Result<Arc<dyn ImageStore>, UploadError> {
    match config.backend {
        UploadBackend::Local => Ok(Arc::new(LocalImageStore::new(
            &config.local_dir,
            &config.public_base_url,
        ))),
        UploadBackend::Remote => {
            let endpoint = config
                .remote_endpoint
                .clone()
                .ok_or_else(|| UploadError::Storage("UPLOAD_REMOTE_ENDPOINT is not set".to_string()))?;
            Ok(Arc::new(RemoteImageStore::new(endpoint, config.remote_token.clone())))
        }
    }
}

static STORE: OnceCell<Arc<dyn ImageStore>> = OnceCell::new();

/// Process-wide store built from the loaded configuration on first use.
pub fn image_store() -> Result<Arc<dyn ImageStore>, UploadError> {
    STORE
        .get_or_try_init(|| from_config(&crate::config::config().upload))
        .map(Arc::clone)
}

/// Content-addressed files on local disk, served by the static file layer.
pub struct LocalImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Identical bytes always map to the same file name.
    pub fn file_name(bytes: &[u8], image: ImageKind) -> String {
        let digest = Sha256::digest(bytes);
        format!("{:x}.{}", digest, image.extension())
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, kind: UploadKind, image: ImageKind, bytes: Bytes) -> Result<String, UploadError> {
        let dir = self.root.join(kind.dir());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| UploadError::Storage(format!("create {}: {}", dir.display(), e)))?;

        let file_name = Self::file_name(&bytes, image);
        let path = dir.join(&file_name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!("Upload {} already stored", file_name);
        } else {
            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|e| UploadError::Storage(format!("write {}: {}", path.display(), e)))?;
            tracing::info!("Stored upload {} ({} bytes)", path.display(), bytes.len());
        }

        Ok(format!("{}/{}/{}", self.public_base_url, kind.dir(), file_name))
    }
}

/// Forwards uploads to an external HTTP upload service that answers `{ "url": ... }`.
pub struct RemoteImageStore {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl RemoteImageStore {
    pub fn new(endpoint: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            token,
        }
    }

    fn extract_url(body: &Value) -> Option<String> {
        body.get("url")
            .or_else(|| body.get("data").and_then(|d| d.get("url")))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[async_trait]
impl ImageStore for RemoteImageStore {
    async fn store(&self, kind: UploadKind, image: ImageKind, bytes: Bytes) -> Result<String, UploadError> {
        let file_name = LocalImageStore::file_name(&bytes, image);
        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name)
            .mime_str(image.mime())
            .map_err(|e| UploadError::Upstream(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("type", kind.dir());

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UploadError::Upstream(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Upstream(format!("upload service returned {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| UploadError::Upstream(format!("unreadable response: {}", e)))?;
        Self::extract_url(&body)
            .ok_or_else(|| UploadError::Upstream("response did not include a url".to_string()))
    }
}
