//! Spreadsheet-backed job store implementation.

use async_trait::async_trait;

use super::client::{SheetsClient, ValueInput};
use crate::job::{
    adapters::row::{CANONICAL_HEADER, JobRow},
    domain::{EmailAddress, JobId, JobRecord, QrReference, StatusStage},
    ports::{JobStore, JobStoreError, JobStoreResult},
};

/// Worksheet that holds the job table.
const SHEET_NAME: &str = "Jobs";

/// First data row (row 1 is the header).
const FIRST_DATA_ROW: usize = 2;

/// Column letter of the status field in the canonical order.
const STATUS_COLUMN: char = 'E';

/// Column letter of the QR reference field in the canonical order.
const QR_COLUMN: char = 'G';

/// Job store over the `Jobs` worksheet of one spreadsheet.
///
/// The QR reference column is written with user-entered input so that
/// `=IMAGE("...")` cells render inline in the sheet; everything else is
/// written raw.
#[derive(Debug, Clone)]
pub struct SheetsJobStore {
    client: SheetsClient,
}

impl SheetsJobStore {
    /// Opens the store, validating the worksheet header.
    ///
    /// An empty worksheet gets the canonical header written; a worksheet
    /// with a different header is rejected rather than silently cleared —
    /// migrating a legacy sheet is an operator action, not something to do
    /// behind a read path.
    ///
    /// # Errors
    ///
    /// Returns [`JobStoreError::Storage`] on API failure or when the
    /// existing header does not match the canonical schema.
    pub async fn open(client: SheetsClient) -> JobStoreResult<Self> {
        let header_range = format!("{SHEET_NAME}!1:1");
        let mut rows = client
            .values_get(&header_range)
            .await
            .map_err(JobStoreError::storage)?;
        let header = rows.pop().unwrap_or_default();

        if header.is_empty() {
            client
                .values_update(
                    &header_range,
                    CANONICAL_HEADER.iter().map(|&cell| cell.to_owned()).collect(),
                    ValueInput::Raw,
                )
                .await
                .map_err(JobStoreError::storage)?;
        } else {
            let matches = header.len() == CANONICAL_HEADER.len()
                && header
                    .iter()
                    .zip(CANONICAL_HEADER)
                    .all(|(found, expected)| found.trim() == expected);
            if !matches {
                return Err(JobStoreError::storage(std::io::Error::other(format!(
                    "worksheet header {header:?} does not match the canonical schema"
                ))));
            }
        }

        Ok(Self { client })
    }

    /// Reads all data rows in canonical order.
    async fn load_rows(&self) -> JobStoreResult<Vec<JobRow>> {
        let range = format!("{SHEET_NAME}!A{FIRST_DATA_ROW}:G");
        let raw_rows = self
            .client
            .values_get(&range)
            .await
            .map_err(JobStoreError::storage)?;
        raw_rows
            .iter()
            .enumerate()
            .map(|(index, cells)| {
                JobRow::from_cells(cells).ok_or(JobStoreError::MalformedRecord {
                    row: index + 1,
                    reason: format!("expected at most {} columns", CANONICAL_HEADER.len()),
                })
            })
            .collect()
    }

    /// Finds the worksheet row number holding `job_id`, if any.
    async fn row_number_of(&self, job_id: &JobId) -> JobStoreResult<Option<usize>> {
        let rows = self.load_rows().await?;
        Ok(rows
            .iter()
            .position(|row| row.job_id == job_id.as_str())
            .map(|index| index + FIRST_DATA_ROW))
    }

    /// Overwrites one cell, addressed by column letter and row number.
    async fn write_cell(
        &self,
        column: char,
        row_number: usize,
        value: String,
        input: ValueInput,
    ) -> JobStoreResult<()> {
        let range = format!("{SHEET_NAME}!{column}{row_number}");
        self.client
            .values_update(&range, vec![value], input)
            .await
            .map_err(JobStoreError::storage)
    }
}

#[async_trait]
impl JobStore for SheetsJobStore {
    async fn append(&self, record: &JobRecord) -> JobStoreResult<()> {
        // Semantic pre-check only; the sheet has no unique index, so the
        // duplicate guard lives here.
        if self.row_number_of(record.job_id()).await?.is_some() {
            return Err(JobStoreError::DuplicateJob(record.job_id().clone()));
        }

        // Append the row without the QR cell, then write the formula with
        // user-entered input so the sheet renders the image.
        let mut row = JobRow::from_record(record);
        let reference_cell = std::mem::take(&mut row.qr_reference);
        self.client
            .values_append(
                &format!("{SHEET_NAME}!A:G"),
                row.to_cells(),
                ValueInput::Raw,
            )
            .await
            .map_err(JobStoreError::storage)?;

        if !reference_cell.is_empty() {
            if let Some(row_number) = self.row_number_of(record.job_id()).await? {
                self.write_cell(QR_COLUMN, row_number, reference_cell, ValueInput::UserEntered)
                    .await?;
            }
        }
        Ok(())
    }

    async fn find_by_id(&self, job_id: &JobId) -> JobStoreResult<Option<JobRecord>> {
        let rows = self.load_rows().await?;
        rows.into_iter()
            .enumerate()
            .find(|(_, row)| row.job_id == job_id.as_str())
            .map(|(index, row)| row.into_record(index + 1))
            .transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> JobStoreResult<Vec<JobRecord>> {
        let rows = self.load_rows().await?;
        rows.into_iter()
            .enumerate()
            .filter(|(_, row)| row.client_email.trim().to_ascii_lowercase() == email.as_str())
            .map(|(index, row)| row.into_record(index + 1))
            .collect()
    }

    async fn update_status(&self, job_id: &JobId, status: StatusStage) -> JobStoreResult<bool> {
        let Some(row_number) = self.row_number_of(job_id).await? else {
            return Ok(false);
        };
        self.write_cell(
            STATUS_COLUMN,
            row_number,
            status.as_str().to_owned(),
            ValueInput::Raw,
        )
        .await?;
        Ok(true)
    }

    async fn set_qr_reference(
        &self,
        job_id: &JobId,
        reference: &QrReference,
    ) -> JobStoreResult<bool> {
        let Some(row_number) = self.row_number_of(job_id).await? else {
            return Ok(false);
        };
        self.write_cell(QR_COLUMN, row_number, reference.as_cell(), ValueInput::UserEntered)
            .await?;
        Ok(true)
    }

    async fn scan_all(&self) -> JobStoreResult<Vec<JobRecord>> {
        let rows = self.load_rows().await?;
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| row.into_record(index + 1))
            .collect()
    }
}
