//! Notifier port for delivering tracking links to clients.

use crate::job::domain::{EmailAddress, JobRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Delivers the tracking link and QR image for a freshly created job.
#[async_trait]
pub trait JobNotifier: Send + Sync {
    /// Sends the creation notification to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the message cannot be built or sent.
    /// The caller treats this as a degradation, never a rollback.
    async fn job_created(
        &self,
        recipient: &EmailAddress,
        record: &JobRecord,
        tracking_url: &str,
        qr_png: &[u8],
    ) -> NotifyResult<()>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// The message could not be assembled (bad address or attachment).
    #[error("could not build notification: {0}")]
    InvalidMessage(String),

    /// The mail transport failed.
    #[error("notification transport failed: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifyError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
