//! Status workflow orchestration: create, update, and view print jobs.

use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::AdminSession;
use crate::job::{
    domain::{EmailAddress, JobDomainError, JobId, JobRecord, QrReference, StageProgress, StatusStage},
    ports::{ImagePublisher, JobNotifier, JobStore, JobStoreError},
};
use crate::qr::{self, QrEncodeError, QrStyle};
use cap_std::fs_utf8::Dir;

/// Request payload for creating a print job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateJobRequest {
    client_name: String,
    file_name: String,
    client_email: Option<String>,
}

impl CreateJobRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(client_name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            file_name: file_name.into(),
            client_email: None,
        }
    }

    /// Sets the client email used for lookup and delivery.
    #[must_use]
    pub fn with_client_email(mut self, email: impl Into<String>) -> Self {
        self.client_email = Some(email.into());
        self
    }
}

/// Service-level errors for the status workflow.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Input validation failed; nothing was written.
    #[error(transparent)]
    Domain(#[from] JobDomainError),

    /// QR encoding failed before the record was appended.
    #[error(transparent)]
    Qr(#[from] QrEncodeError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] JobStoreError),

    /// No record matched the lookup key.
    #[error("no job found for {0}")]
    NotFound(String),
}

/// Result type for status workflow operations.
pub type TrackingResult<T> = Result<T, TrackingError>;

/// A degradation that occurred after the point of no return.
///
/// The record exists; the named side effect did not happen and the
/// operator must redo it (regenerate the QR, resend the mail).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateJobWarning {
    /// The QR image could not be published to the image host.
    QrUnpublished(String),
    /// The QR image could not be written to the local output directory.
    QrUnsaved(String),
    /// The notification email could not be delivered.
    EmailUndelivered(String),
}

/// Outcome of a successful (possibly degraded) job creation.
#[derive(Debug, Clone)]
pub struct CreatedJob {
    /// The appended record.
    pub record: JobRecord,
    /// Public tracking URL encoded in the QR image.
    pub tracking_url: String,
    /// The rendered QR image as PNG bytes, for display and download.
    pub qr_png: Vec<u8>,
    /// Degradations that occurred after the record was appended.
    pub warnings: Vec<CreateJobWarning>,
}

/// Client-facing lookup key.
///
/// Job id is the primary key every tracking URL carries; email lookup is
/// the fallback for clients who lost their slip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    /// Exact job token, as encoded in the QR.
    JobId(JobId),
    /// All jobs under one client address.
    Email(EmailAddress),
}

/// One stage cell in the progress ribbon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageView {
    /// Stage display label.
    pub label: String,
    /// Position of this stage relative to the job's current stage.
    pub progress: StageProgress,
}

/// One job on the client-facing status page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatusView {
    /// Job token.
    pub job_id: String,
    /// Client name.
    pub client_name: String,
    /// File name / description.
    pub file_name: String,
    /// Creation timestamp, formatted for display.
    pub created_at: String,
    /// Current stage label.
    pub current_stage: String,
    /// Friendly message for the current stage.
    pub message: String,
    /// All stages in display order with their progress classification.
    pub stages: Vec<StageView>,
    /// Fetchable QR image URL, when a usable reference exists.
    pub qr_image_url: Option<String>,
}

/// What the status page shows: one or more jobs under the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    /// Matched jobs, store order.
    pub jobs: Vec<JobStatusView>,
}

/// Status workflow orchestration service.
#[derive(Clone)]
pub struct TrackingService<S, C>
where
    S: JobStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    base_url: String,
    qr_style: QrStyle,
    publisher: Option<Arc<dyn ImagePublisher>>,
    notifier: Option<Arc<dyn JobNotifier>>,
    qr_dir: Option<Arc<Dir>>,
    sheet_formula_references: bool,
}

impl<S, C> TrackingService<S, C>
where
    S: JobStore,
    C: Clock + Send + Sync,
{
    /// Creates a service over the given store and clock.
    ///
    /// `base_url` is the public viewer address; tracking URLs are built as
    /// `base_url?job_id=<id>`, which must stay bit-exact for already-issued
    /// QR codes to keep resolving.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, base_url: impl Into<String>, qr_style: QrStyle) -> Self {
        Self {
            store,
            clock,
            base_url: base_url.into(),
            qr_style,
            publisher: None,
            notifier: None,
            qr_dir: None,
            sheet_formula_references: false,
        }
    }

    /// Publishes QR images to an external host instead of the filesystem.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn ImagePublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Emails the tracking link to clients that provided an address.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn JobNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Saves QR images under a local output directory.
    #[must_use]
    pub fn with_qr_dir(mut self, dir: Arc<Dir>) -> Self {
        self.qr_dir = Some(dir);
        self
    }

    /// Records published QR URLs as spreadsheet `=IMAGE(...)` formulas so
    /// a sheet-backed store renders them inline.
    #[must_use]
    pub const fn with_sheet_formula_references(mut self) -> Self {
        self.sheet_formula_references = true;
        self
    }

    /// Creates a job: validates input, renders the QR, appends the record,
    /// and performs the optional publish and email side effects.
    ///
    /// Validation and QR-encoding failures abort before any side effect.
    /// Publish and email failures after that point degrade the outcome
    /// (see [`CreateJobWarning`]) but never roll back the append.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Domain`] on validation failure,
    /// [`TrackingError::Qr`] when the tracking URL exceeds QR capacity, and
    /// [`TrackingError::Store`] when the append fails.
    pub async fn create_job(
        &self,
        _session: &AdminSession,
        request: CreateJobRequest,
    ) -> TrackingResult<CreatedJob> {
        let client_email = request
            .client_email
            .map(EmailAddress::parse)
            .transpose()?;
        let mut record = JobRecord::new(
            request.client_name,
            request.file_name,
            client_email,
            &*self.clock,
        )?;

        let tracking_url = format!("{}?job_id={}", self.base_url, record.job_id());
        let qr_image = qr::encode(&tracking_url, &self.qr_style)?;
        let qr_png = qr::to_png_bytes(&qr_image)?;

        let mut warnings = Vec::new();
        if let Some(publisher) = &self.publisher {
            match publisher.publish(&qr_png, record.job_id().as_str()).await {
                Ok(published) => {
                    let reference = if self.sheet_formula_references {
                        QrReference::SheetFormula(published.url)
                    } else {
                        QrReference::ImageUrl(published.url)
                    };
                    record.set_qr_reference(reference);
                }
                Err(err) => {
                    tracing::warn!(job_id = %record.job_id(), error = %err, "QR publish failed");
                    warnings.push(CreateJobWarning::QrUnpublished(err.to_string()));
                }
            }
        } else if let Some(dir) = &self.qr_dir {
            match qr::write_png(dir, record.job_id().as_str(), &qr_image) {
                Ok(file_name) => record.set_qr_reference(QrReference::LocalPath(file_name)),
                Err(err) => {
                    tracing::warn!(job_id = %record.job_id(), error = %err, "QR save failed");
                    warnings.push(CreateJobWarning::QrUnsaved(err.to_string()));
                }
            }
        }

        self.store.append(&record).await?;
        tracing::info!(job_id = %record.job_id(), "job created");

        if let (Some(notifier), Some(email)) = (&self.notifier, record.client_email()) {
            if let Err(err) = notifier
                .job_created(email, &record, &tracking_url, &qr_png)
                .await
            {
                tracing::warn!(job_id = %record.job_id(), error = %err, "notification failed");
                warnings.push(CreateJobWarning::EmailUndelivered(err.to_string()));
            }
        }

        Ok(CreatedJob {
            record,
            tracking_url,
            qr_png,
            warnings,
        })
    }

    /// Moves a job to `stage`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::NotFound`] when no record matches and
    /// [`TrackingError::Store`] on persistence failure.
    pub async fn update_job_status(
        &self,
        _session: &AdminSession,
        job_id: &JobId,
        stage: StatusStage,
    ) -> TrackingResult<()> {
        if !self.store.update_status(job_id, stage).await? {
            return Err(TrackingError::NotFound(format!("job id {job_id}")));
        }
        tracing::info!(%job_id, stage = stage.as_str(), "status updated");
        Ok(())
    }

    /// Backfills the QR reference of a record left degraded at creation.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::NotFound`] when no record matches and
    /// [`TrackingError::Store`] on persistence failure.
    pub async fn attach_qr_reference(
        &self,
        _session: &AdminSession,
        job_id: &JobId,
        reference: &QrReference,
    ) -> TrackingResult<()> {
        if !self.store.set_qr_reference(job_id, reference).await? {
            return Err(TrackingError::NotFound(format!("job id {job_id}")));
        }
        Ok(())
    }

    /// Returns every record for the admin table.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Store`] on persistence failure.
    pub async fn list_jobs(&self, _session: &AdminSession) -> TrackingResult<Vec<JobRecord>> {
        Ok(self.store.scan_all().await?)
    }

    /// Looks up the client-facing status view by job id or email.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::NotFound`] when nothing matches and
    /// [`TrackingError::Store`] on persistence failure.
    pub async fn view_status(&self, key: &LookupKey) -> TrackingResult<StatusView> {
        let records = match key {
            LookupKey::JobId(job_id) => {
                let record = self
                    .store
                    .find_by_id(job_id)
                    .await?
                    .ok_or_else(|| TrackingError::NotFound(format!("job id {job_id}")))?;
                vec![record]
            }
            LookupKey::Email(email) => {
                let matches = self.store.find_by_email(email).await?;
                if matches.is_empty() {
                    return Err(TrackingError::NotFound(format!("email {email}")));
                }
                matches
            }
        };

        Ok(StatusView {
            jobs: records.iter().map(status_view_of).collect(),
        })
    }
}

/// Projects one record into its status-page view.
fn status_view_of(record: &JobRecord) -> JobStatusView {
    let current = record.status();
    let stages = StatusStage::ALL
        .iter()
        .map(|&stage| StageView {
            label: stage.as_str().to_owned(),
            progress: current.progress_of(stage),
        })
        .collect();

    JobStatusView {
        job_id: record.job_id().to_string(),
        client_name: record.client_name().to_owned(),
        file_name: record.file_name().to_owned(),
        created_at: record.created_at().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        current_stage: current.as_str().to_owned(),
        message: current.client_message().to_owned(),
        stages,
        qr_image_url: record
            .qr_reference()
            .and_then(QrReference::image_url)
            .map(str::to_owned),
    }
}
