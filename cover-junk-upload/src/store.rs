//! Object store abstraction and the Cloudflare R2 implementation.

use std::future::Future;
use std::path::Path;

use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region, retry::RetryConfig},
    error::DisplayErrorContext,
    primitives::ByteStream,
};

use crate::config::{R2_REGION, UploadConfig};
use crate::error::UploadError;

/// Destination for uploaded files.
///
/// One call is one attempt; retrying is left to the caller.
pub trait ObjectStore: Send + Sync {
    /// Store the contents of `path` under `key`.
    fn put_file(
        &self,
        key: &str,
        path: &Path,
    ) -> impl Future<Output = Result<(), UploadError>> + Send;
}

/// S3-compatible client pointed at an R2 bucket.
#[derive(Debug, Clone)]
pub struct R2Store {
    client: Client,
    bucket: String,
}

impl R2Store {
    pub fn new(config: &UploadConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "cover-junk-env",
        );
        let sdk_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(R2_REGION))
            .endpoint_url(config.endpoint())
            // Attempts are counted by the uploader
            .retry_config(RetryConfig::disabled())
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
            bucket: config.bucket.clone(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl ObjectStore for R2Store {
    async fn put_file(&self, key: &str, path: &Path) -> Result<(), UploadError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(UploadError::store)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type(path))
            .body(body)
            .send()
            .await
            .map_err(|e| UploadError::store(DisplayErrorContext(e)))?;

        log::debug!("PUT s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

/// MIME type sent with an object, chosen from the file extension.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}
