//! Job record aggregate and QR reference forms.

use super::{EmailAddress, JobDomainError, JobId, StatusStage};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to the QR image generated for a job.
///
/// Three forms exist across deployments: a path relative to the local QR
/// output directory, a directly fetchable image URL, and the spreadsheet
/// `=IMAGE("...")` formula that sheet-backed stores display inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum QrReference {
    /// Path to a PNG under the local QR output directory.
    LocalPath(String),
    /// Directly fetchable image URL.
    ImageUrl(String),
    /// Spreadsheet image formula wrapping a hosted URL.
    SheetFormula(String),
}

impl QrReference {
    /// Parses a stored reference cell.
    ///
    /// Returns `None` for an empty cell. `=IMAGE("url")` formulas keep only
    /// the wrapped URL; anything starting with `http` is a direct URL;
    /// everything else is treated as a local path.
    #[must_use]
    pub fn parse_cell(cell: &str) -> Option<Self> {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.starts_with("=IMAGE(") {
            return trimmed
                .split('"')
                .nth(1)
                .map(|url| Self::SheetFormula(url.to_owned()));
        }
        if trimmed.starts_with("http") {
            return Some(Self::ImageUrl(trimmed.to_owned()));
        }
        Some(Self::LocalPath(trimmed.to_owned()))
    }

    /// Returns the serialized cell value for tabular stores.
    #[must_use]
    pub fn as_cell(&self) -> String {
        match self {
            Self::LocalPath(path) => path.clone(),
            Self::ImageUrl(url) => url.clone(),
            Self::SheetFormula(url) => format!("=IMAGE(\"{url}\")"),
        }
    }

    /// Returns the fetchable image URL when one exists.
    ///
    /// Local paths are not fetchable by a remote client and yield `None`.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::LocalPath(_) => None,
            Self::ImageUrl(url) | Self::SheetFormula(url) => Some(url),
        }
    }
}

impl fmt::Display for QrReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cell())
    }
}

/// Job record aggregate root: one row per print job.
///
/// `created_at` is immutable after construction; `status` and the QR
/// reference are the only fields that ever change, and records are never
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    job_id: JobId,
    client_name: String,
    file_name: String,
    client_email: Option<EmailAddress>,
    status: StatusStage,
    created_at: DateTime<Utc>,
    qr_reference: Option<QrReference>,
}

/// Parameter object for reconstructing a persisted job record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedJobData {
    /// Persisted job identifier.
    pub job_id: JobId,
    /// Persisted client name.
    pub client_name: String,
    /// Persisted file name / description.
    pub file_name: String,
    /// Persisted client email, if any.
    pub client_email: Option<EmailAddress>,
    /// Persisted status stage.
    pub status: StatusStage,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted QR reference, if any.
    pub qr_reference: Option<QrReference>,
}

impl JobRecord {
    /// Creates a new job record in the initial stage.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyClientName`] or
    /// [`JobDomainError::EmptyFileName`] when a required field is empty
    /// after trimming.
    pub fn new(
        client_name: impl Into<String>,
        file_name: impl Into<String>,
        client_email: Option<EmailAddress>,
        clock: &impl Clock,
    ) -> Result<Self, JobDomainError> {
        let client = non_empty(client_name.into(), JobDomainError::EmptyClientName)?;
        let file = non_empty(file_name.into(), JobDomainError::EmptyFileName)?;
        Ok(Self {
            job_id: JobId::generate(),
            client_name: client,
            file_name: file,
            client_email,
            status: StatusStage::INITIAL,
            created_at: clock.utc(),
            qr_reference: None,
        })
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobData) -> Self {
        Self {
            job_id: data.job_id,
            client_name: data.client_name,
            file_name: data.file_name,
            client_email: data.client_email,
            status: data.status,
            created_at: data.created_at,
            qr_reference: data.qr_reference,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Returns the client name.
    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Returns the file name / description.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the client email address, if one was recorded.
    #[must_use]
    pub const fn client_email(&self) -> Option<&EmailAddress> {
        self.client_email.as_ref()
    }

    /// Returns the current status stage.
    #[must_use]
    pub const fn status(&self) -> StatusStage {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the QR reference, if one was recorded.
    #[must_use]
    pub const fn qr_reference(&self) -> Option<&QrReference> {
        self.qr_reference.as_ref()
    }

    /// Moves the job to `stage`.
    ///
    /// Any stage may move to any other stage; the sequence constrains
    /// display order, not transitions.
    pub fn set_status(&mut self, stage: StatusStage) {
        self.status = stage;
    }

    /// Records the QR reference, replacing any previous value.
    ///
    /// Used both at creation and by the operator repair path after a
    /// degraded creation left the reference empty.
    pub fn set_qr_reference(&mut self, reference: QrReference) {
        self.qr_reference = Some(reference);
    }
}

/// Trims a required field, mapping emptiness to the given error.
fn non_empty(value: String, error: JobDomainError) -> Result<String, JobDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}
