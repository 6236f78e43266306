//! Publisher port for hosting QR images externally.
//!
//! Spreadsheet-backed stores can display images solely by external URL
//! reference, so the QR image has to live on a host the sheet can fetch.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for image publishing operations.
pub type PublishResult<T> = Result<T, ImagePublishError>;

/// A successfully published image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedImage {
    /// Durable, publicly fetchable URL for the image.
    pub url: String,
}

/// Uploads a raster image and returns a publicly fetchable URL.
#[async_trait]
pub trait ImagePublisher: Send + Sync {
    /// Publishes PNG bytes under the given file stem.
    ///
    /// # Errors
    ///
    /// Returns [`ImagePublishError`] on transport failure or upstream
    /// rejection. The caller treats this as a degradation of the in-flight
    /// creation, not a rollback.
    async fn publish(&self, png_bytes: &[u8], file_stem: &str) -> PublishResult<PublishedImage>;
}

/// Errors returned by image publisher implementations.
#[derive(Debug, Clone, Error)]
pub enum ImagePublishError {
    /// The hosting service rejected the upload.
    #[error("image host rejected upload: {0}")]
    Rejected(String),

    /// Transport-level failure reaching the hosting service.
    #[error("image host unreachable: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl ImagePublishError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
