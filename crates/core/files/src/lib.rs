#[macro_use]
extern crate log;

#[macro_use]
extern crate async_trait;

#[macro_use]
extern crate cleancity_result;

use std::sync::Arc;

use aws_sdk_s3::{
    config::{Credentials, Region},
    Client, Config,
};
use futures::lock::Mutex;

use cleancity_config::{config, FilesS3};
use cleancity_result::Result;

/// Photo bytes captured by the device camera
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

/// Create an S3 client
pub fn create_client(s3_config: FilesS3) -> Client {
    let provider_name = "cleancity-creds";
    let creds = Credentials::new(
        s3_config.access_key_id,
        s3_config.secret_access_key,
        None,
        None,
        provider_name,
    );

    let config = Config::builder()
        .region(Region::new(s3_config.region))
        .endpoint_url(s3_config.endpoint)
        .credentials_provider(creds)
        .build();

    Client::from_conf(config)
}

/// Check that the buffer decodes as an image before spending an upload on it
pub fn validate_image(bytes: &[u8]) -> Result<()> {
    imagesize::blob_size(bytes).map_err(|_| create_error!(InvalidImage))?;
    Ok(())
}

/// Image hosting collaborator
///
/// Upload is the single slow, network-bound step of report submission;
/// dropping the returned future cancels the transfer.
#[async_trait]
pub trait AbstractImageHost: Sync + Send {
    /// Store the image and return its public URL
    async fn upload(&self, image: &CapturedImage) -> Result<String>;
}

/// Image host backed by an S3-compatible bucket behind a public CDN
#[derive(Clone, Default)]
pub struct S3ImageHost;

#[async_trait]
impl AbstractImageHost for S3ImageHost {
    async fn upload(&self, image: &CapturedImage) -> Result<String> {
        validate_image(&image.bytes)?;

        let config = config().await;
        let client = create_client(config.files.s3.clone());
        let key = ulid::Ulid::new().to_string();

        report_internal_error!(
            client
                .put_object()
                .bucket(&config.files.s3.bucket)
                .key(&key)
                .content_type(&image.content_type)
                .body(image.bytes.clone().into())
                .send()
                .await
        )?;

        Ok(format!("{}/{}/{}", config.hosts.cdn, config.files.s3.bucket, key))
    }
}

/// Reference implementation retaining uploads in memory
#[derive(Clone, Default)]
pub struct InMemoryImageHost {
    uploads: Arc<Mutex<Vec<(String, CapturedImage)>>>,
    failing: Arc<Mutex<bool>>,
}

impl InMemoryImageHost {
    pub fn new() -> Self {
        Default::default()
    }

    /// Make subsequent uploads fail, for exercising error paths
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.lock().await = failing;
    }

    /// Number of stored uploads
    pub async fn upload_count(&self) -> usize {
        self.uploads.lock().await.len()
    }
}

#[async_trait]
impl AbstractImageHost for InMemoryImageHost {
    async fn upload(&self, image: &CapturedImage) -> Result<String> {
        if *self.failing.lock().await {
            return Err(create_error!(UploadFailed {
                message: "simulated transport failure".to_string()
            }));
        }

        validate_image(&image.bytes)?;

        let key = ulid::Ulid::new().to_string();
        let url = format!("memory://images/{key}");
        self.uploads.lock().await.push((url.clone(), image.clone()));

        debug!("stored image {} ({} bytes)", url, image.bytes.len());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest header imagesize recognises as a 1x1 GIF
    pub fn tiny_gif() -> Vec<u8> {
        b"GIF89a\x01\x00\x01\x00\x80\x00\x00".to_vec()
    }

    fn captured() -> CapturedImage {
        CapturedImage {
            bytes: tiny_gif(),
            content_type: "image/gif".to_string(),
            filename: "report.gif".to_string(),
        }
    }

    #[test]
    fn validate_accepts_real_image_bytes() {
        assert!(validate_image(&tiny_gif()).is_ok());
    }

    #[test]
    fn validate_rejects_junk() {
        assert!(validate_image(b"definitely not an image").is_err());
    }

    #[tokio::test]
    async fn in_memory_host_returns_distinct_urls() {
        let host = InMemoryImageHost::new();

        let first = host.upload(&captured()).await.unwrap();
        let second = host.upload(&captured()).await.unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("memory://images/"));
        assert_eq!(host.upload_count().await, 2);
    }

    #[tokio::test]
    async fn in_memory_host_failure_injection() {
        let host = InMemoryImageHost::new();
        host.set_failing(true).await;

        assert!(host.upload(&captured()).await.is_err());
        assert_eq!(host.upload_count().await, 0);
    }
}
