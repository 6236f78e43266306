//! In-memory job store for tests and single-process deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::job::{
    domain::{EmailAddress, JobId, JobRecord, QrReference, StatusStage},
    ports::{JobStore, JobStoreError, JobStoreResult},
};

/// Thread-safe in-memory job store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    records: HashMap<JobId, JobRecord>,
    // Append order, preserved for scan_all.
    order: Vec<JobId>,
    email_index: HashMap<EmailAddress, Vec<JobId>>,
}

impl InMemoryJobStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn index_email(state: &mut InMemoryState, record: &JobRecord) {
    if let Some(email) = record.client_email() {
        state
            .email_index
            .entry(email.clone())
            .or_default()
            .push(record.job_id().clone());
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> JobStoreError {
    JobStoreError::storage(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn append(&self, record: &JobRecord) -> JobStoreResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.records.contains_key(record.job_id()) {
            return Err(JobStoreError::DuplicateJob(record.job_id().clone()));
        }
        index_email(&mut state, record);
        state.order.push(record.job_id().clone());
        state.records.insert(record.job_id().clone(), record.clone());
        Ok(())
    }

    async fn find_by_id(&self, job_id: &JobId) -> JobStoreResult<Option<JobRecord>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.records.get(job_id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> JobStoreResult<Vec<JobRecord>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let records = state
            .email_index
            .get(email)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.records.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    async fn update_status(&self, job_id: &JobId, status: StatusStage) -> JobStoreResult<bool> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        Ok(state.records.get_mut(job_id).is_some_and(|record| {
            record.set_status(status);
            true
        }))
    }

    async fn set_qr_reference(
        &self,
        job_id: &JobId,
        reference: &QrReference,
    ) -> JobStoreResult<bool> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        Ok(state.records.get_mut(job_id).is_some_and(|record| {
            record.set_qr_reference(reference.clone());
            true
        }))
    }

    async fn scan_all(&self) -> JobStoreResult<Vec<JobRecord>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.records.get(id).cloned())
            .collect())
    }
}
