//! Row mapping between tabular store cells and the job record aggregate.
//!
//! Shared by the CSV and spreadsheet adapters: both persist the canonical
//! column order and both must reject rows that do not match the schema at
//! the store boundary instead of string-indexing fields at point of use.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::job::{
    domain::{EmailAddress, JobId, JobRecord, PersistedJobData, QrReference, StatusStage},
    ports::JobStoreError,
};

/// Canonical column order. Every store file is held to exactly this header;
/// older layouts are migrated on open, never branched on at runtime.
pub(super) const CANONICAL_HEADER: [&str; 7] = [
    "job_id",
    "client_name",
    "file_name",
    "client_email",
    "status",
    "created_at",
    "qr_reference",
];

/// Timestamp format older revisions wrote (`datetime.isoformat(sep=" ")`).
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One CSV row in canonical column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct JobRow {
    pub job_id: String,
    pub client_name: String,
    pub file_name: String,
    pub client_email: String,
    pub status: String,
    pub created_at: String,
    pub qr_reference: String,
}

impl JobRow {
    /// Maps a record to its canonical row form.
    pub fn from_record(record: &JobRecord) -> Self {
        Self {
            job_id: record.job_id().to_string(),
            client_name: record.client_name().to_owned(),
            file_name: record.file_name().to_owned(),
            client_email: record
                .client_email()
                .map(ToString::to_string)
                .unwrap_or_default(),
            status: record.status().as_str().to_owned(),
            created_at: record.created_at().to_rfc3339(),
            qr_reference: record
                .qr_reference()
                .map(QrReference::as_cell)
                .unwrap_or_default(),
        }
    }

    /// Validates this row against the canonical schema and rebuilds the
    /// record.
    ///
    /// `row_number` is the 1-based data row position, used in rejection
    /// messages so the operator can find the offending line.
    pub fn into_record(self, row_number: usize) -> Result<JobRecord, JobStoreError> {
        let malformed = |reason: String| JobStoreError::MalformedRecord {
            row: row_number,
            reason,
        };

        let job_id = JobId::parse(self.job_id).map_err(|err| malformed(err.to_string()))?;
        let client_email = if self.client_email.trim().is_empty() {
            None
        } else {
            Some(
                EmailAddress::parse(self.client_email)
                    .map_err(|err| malformed(err.to_string()))?,
            )
        };
        let status = StatusStage::try_from(self.status.as_str())
            .map_err(|err| malformed(err.to_string()))?;
        let created_at =
            parse_timestamp(&self.created_at).ok_or_else(|| {
                malformed(format!("unparseable created_at: {:?}", self.created_at))
            })?;

        if self.client_name.trim().is_empty() {
            return Err(malformed("empty client_name".to_owned()));
        }
        if self.file_name.trim().is_empty() {
            return Err(malformed("empty file_name".to_owned()));
        }

        Ok(JobRecord::from_persisted(PersistedJobData {
            job_id,
            client_name: self.client_name,
            file_name: self.file_name,
            client_email,
            status,
            created_at,
            qr_reference: QrReference::parse_cell(&self.qr_reference),
        }))
    }
}

/// Parses RFC 3339 first, then the legacy space-separated format (assumed
/// UTC, as the original deployments were).
pub(super) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, LEGACY_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

impl JobRow {
    /// Builds a row from spreadsheet cells in canonical column order.
    ///
    /// Spreadsheet reads drop trailing empty cells, so short rows are
    /// padded; rows with extra columns are rejected by the caller via
    /// `None`.
    pub(super) fn from_cells(cells: &[String]) -> Option<Self> {
        if cells.len() > CANONICAL_HEADER.len() {
            return None;
        }
        let cell = |position: usize| cells.get(position).cloned().unwrap_or_default();
        Some(Self {
            job_id: cell(0),
            client_name: cell(1),
            file_name: cell(2),
            client_email: cell(3),
            status: cell(4),
            created_at: cell(5),
            qr_reference: cell(6),
        })
    }

    /// Returns the row as spreadsheet cells in canonical column order.
    pub(super) fn to_cells(&self) -> Vec<String> {
        vec![
            self.job_id.clone(),
            self.client_name.clone(),
            self.file_name.clone(),
            self.client_email.clone(),
            self.status.clone(),
            self.created_at.clone(),
            self.qr_reference.clone(),
        ]
    }
}

/// Builds a canonical row from a legacy record, given the legacy header.
///
/// Recognized legacy aliases: `description` for `file_name`, `qr_path` for
/// `qr_reference`, and a wholly absent `client_email` column. Unrecognized
/// headers are rejected rather than guessed at.
pub(super) fn row_from_legacy(
    header: &csv::StringRecord,
    record: &csv::StringRecord,
) -> Result<JobRow, String> {
    let field = |names: &[&str]| -> Option<String> {
        header
            .iter()
            .position(|column| names.contains(&column.trim()))
            .and_then(|position| record.get(position))
            .map(str::to_owned)
    };

    let job_id = field(&["job_id"]).ok_or("missing job_id column")?;
    let client_name = field(&["client_name"]).ok_or("missing client_name column")?;
    let file_name = field(&["file_name", "description"])
        .ok_or("missing file_name/description column")?;
    let status = field(&["status"]).ok_or("missing status column")?;
    let created_at = field(&["created_at"]).ok_or("missing created_at column")?;
    let qr_reference =
        field(&["qr_reference", "qr_path"]).ok_or("missing qr_reference/qr_path column")?;
    let client_email = field(&["client_email"]).unwrap_or_default();

    // Normalize the divergent bits while we are rewriting anyway: stage
    // spelling variants and the legacy timestamp format.
    let canonical_status = StatusStage::try_from(status.as_str())
        .map(|stage| stage.as_str().to_owned())
        .unwrap_or(status);
    let canonical_created_at = parse_timestamp(&created_at)
        .map(|timestamp| timestamp.to_rfc3339())
        .unwrap_or(created_at);

    Ok(JobRow {
        job_id,
        client_name,
        file_name,
        client_email,
        status: canonical_status,
        created_at: canonical_created_at,
        qr_reference,
    })
}
