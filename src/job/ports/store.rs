//! Store port for job record persistence and lookup.

use crate::job::domain::{EmailAddress, JobId, JobRecord, QrReference, StatusStage};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for job store operations.
pub type JobStoreResult<T> = Result<T, JobStoreError>;

/// Durable, shared table of job records.
///
/// Records are addressable by job id and scannable for filtering; no delete
/// operation exists anywhere in the system.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Appends one record.
    ///
    /// After return the record is visible to subsequent lookups from any
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns [`JobStoreError::DuplicateJob`] when the job id already
    /// exists.
    async fn append(&self, record: &JobRecord) -> JobStoreResult<()>;

    /// Point read by exact job id.
    ///
    /// Returns `None` when the id does not exist; an absent id is never an
    /// error.
    async fn find_by_id(&self, job_id: &JobId) -> JobStoreResult<Option<JobRecord>>;

    /// Returns every record under the given client email.
    ///
    /// Matching is case-insensitive exact (addresses are stored
    /// normalized); a client may have several jobs under one address.
    async fn find_by_email(&self, email: &EmailAddress) -> JobStoreResult<Vec<JobRecord>>;

    /// Overwrites only the status field of the matching record.
    ///
    /// Returns whether a matching record was found.
    async fn update_status(&self, job_id: &JobId, status: StatusStage) -> JobStoreResult<bool>;

    /// Overwrites only the QR reference of the matching record.
    ///
    /// Backfills the reference after a degraded creation. Returns whether a
    /// matching record was found.
    async fn set_qr_reference(
        &self,
        job_id: &JobId,
        reference: &QrReference,
    ) -> JobStoreResult<bool>;

    /// Full scan in store order, used for the admin table.
    async fn scan_all(&self) -> JobStoreResult<Vec<JobRecord>>;
}

/// Errors returned by job store implementations.
#[derive(Debug, Clone, Error)]
pub enum JobStoreError {
    /// A record with the same job id already exists.
    #[error("duplicate job id: {0}")]
    DuplicateJob(JobId),

    /// A stored row does not match the canonical schema.
    #[error("malformed record at row {row}: {reason}")]
    MalformedRecord {
        /// 1-based row number within the backing table.
        row: usize,
        /// Why the row was rejected.
        reason: String,
    },

    /// Storage-layer failure (unreachable file, network, or auth).
    #[error("storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl JobStoreError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
