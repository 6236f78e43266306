//! CSV-backed job store implementation.

use async_trait::async_trait;
use cap_std::fs_utf8::Dir;
use std::sync::{Arc, Mutex};

use crate::job::adapters::row::{CANONICAL_HEADER, JobRow, row_from_legacy};
use crate::job::{
    domain::{EmailAddress, JobId, JobRecord, QrReference, StatusStage},
    ports::{JobStore, JobStoreError, JobStoreResult},
};

/// Store file name within the data directory.
const STORE_FILE: &str = "jobs.csv";

/// Scratch file used for atomic rewrites.
const SCRATCH_FILE: &str = "jobs.csv.tmp";

/// Job store over one CSV file in a capability-scoped directory.
///
/// Every mutation reads the whole file, applies the change, and rewrites it
/// through a scratch file followed by a rename, so a crash mid-write never
/// leaves a truncated store. A process-local mutex serializes the
/// read-modify-write cycles.
#[derive(Debug, Clone)]
pub struct CsvJobStore {
    inner: Arc<CsvInner>,
}

#[derive(Debug)]
struct CsvInner {
    dir: Dir,
    lock: Mutex<()>,
}

impl CsvJobStore {
    /// Opens the store in `dir`, creating an empty canonical file when none
    /// exists and migrating legacy column layouts when one does.
    ///
    /// # Errors
    ///
    /// Returns [`JobStoreError::Storage`] when the directory is unusable and
    /// [`JobStoreError::MalformedRecord`] when an existing file cannot be
    /// migrated.
    pub fn open(dir: Dir) -> JobStoreResult<Self> {
        if dir.exists(STORE_FILE) {
            migrate_if_legacy(&dir)?;
        } else {
            write_rows(&dir, &[])?;
        }
        Ok(Self {
            inner: Arc::new(CsvInner {
                dir,
                lock: Mutex::new(()),
            }),
        })
    }

    /// Opens the store rooted at an ambient filesystem path.
    ///
    /// # Errors
    ///
    /// Returns [`JobStoreError::Storage`] when the path cannot be opened,
    /// otherwise as [`Self::open`].
    pub fn open_ambient(path: &str) -> JobStoreResult<Self> {
        let dir =
            Dir::open_ambient_dir(path, cap_std::ambient_authority()).map_err(JobStoreError::storage)?;
        Self::open(dir)
    }

    async fn run_blocking<F, T>(&self, f: F) -> JobStoreResult<T>
    where
        F: FnOnce(&Dir) -> JobStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let _guard = inner
                .lock
                .lock()
                .map_err(|err| JobStoreError::storage(std::io::Error::other(err.to_string())))?;
            f(&inner.dir)
        })
        .await
        .map_err(JobStoreError::storage)?
    }
}

#[async_trait]
impl JobStore for CsvJobStore {
    async fn append(&self, record: &JobRecord) -> JobStoreResult<()> {
        let new_row = JobRow::from_record(record);
        let job_id = record.job_id().clone();
        self.run_blocking(move |dir| {
            let mut rows = load_rows(dir)?;
            if rows.iter().any(|row| row.job_id == job_id.as_str()) {
                return Err(JobStoreError::DuplicateJob(job_id));
            }
            rows.push(new_row);
            write_rows(dir, &rows)
        })
        .await
    }

    async fn find_by_id(&self, job_id: &JobId) -> JobStoreResult<Option<JobRecord>> {
        let wanted = job_id.clone();
        self.run_blocking(move |dir| {
            load_rows(dir)?
                .into_iter()
                .enumerate()
                .find(|(_, row)| row.job_id == wanted.as_str())
                .map(|(index, row)| row.into_record(index + 1))
                .transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> JobStoreResult<Vec<JobRecord>> {
        let wanted = email.clone();
        self.run_blocking(move |dir| {
            load_rows(dir)?
                .into_iter()
                .enumerate()
                .filter(|(_, row)| row.client_email.trim().to_ascii_lowercase() == wanted.as_str())
                .map(|(index, row)| row.into_record(index + 1))
                .collect()
        })
        .await
    }

    async fn update_status(&self, job_id: &JobId, status: StatusStage) -> JobStoreResult<bool> {
        let wanted = job_id.clone();
        self.run_blocking(move |dir| {
            let mut rows = load_rows(dir)?;
            let Some(row) = rows.iter_mut().find(|row| row.job_id == wanted.as_str()) else {
                return Ok(false);
            };
            row.status = status.as_str().to_owned();
            write_rows(dir, &rows)?;
            Ok(true)
        })
        .await
    }

    async fn set_qr_reference(
        &self,
        job_id: &JobId,
        reference: &QrReference,
    ) -> JobStoreResult<bool> {
        let wanted = job_id.clone();
        let cell = reference.as_cell();
        self.run_blocking(move |dir| {
            let mut rows = load_rows(dir)?;
            let Some(row) = rows.iter_mut().find(|row| row.job_id == wanted.as_str()) else {
                return Ok(false);
            };
            row.qr_reference = cell;
            write_rows(dir, &rows)?;
            Ok(true)
        })
        .await
    }

    async fn scan_all(&self) -> JobStoreResult<Vec<JobRecord>> {
        self.run_blocking(|dir| {
            load_rows(dir)?
                .into_iter()
                .enumerate()
                .map(|(index, row)| row.into_record(index + 1))
                .collect()
        })
        .await
    }
}

/// Reads every data row from the store file.
fn load_rows(dir: &Dir) -> JobStoreResult<Vec<JobRow>> {
    let contents = dir
        .read_to_string(STORE_FILE)
        .map_err(JobStoreError::storage)?;
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let mut rows = Vec::new();
    for (index, parsed) in reader.deserialize::<JobRow>().enumerate() {
        let row = parsed.map_err(|err| JobStoreError::MalformedRecord {
            row: index + 1,
            reason: err.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Rewrites the store file with the given rows, header included, through a
/// scratch file and rename.
fn write_rows(dir: &Dir, rows: &[JobRow]) -> JobStoreResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(CANONICAL_HEADER)
        .map_err(JobStoreError::storage)?;
    for row in rows {
        writer.serialize(row).map_err(JobStoreError::storage)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| JobStoreError::storage(std::io::Error::other(err.to_string())))?;

    dir.write(SCRATCH_FILE, &bytes)
        .map_err(JobStoreError::storage)?;
    dir.rename(SCRATCH_FILE, dir, STORE_FILE)
        .map_err(JobStoreError::storage)
}

/// Rewrites a legacy-layout file into the canonical schema.
///
/// Runs once, at open; afterwards the header always matches
/// [`CANONICAL_HEADER`] and no runtime code branches on header shape.
fn migrate_if_legacy(dir: &Dir) -> JobStoreResult<()> {
    let contents = dir
        .read_to_string(STORE_FILE)
        .map_err(JobStoreError::storage)?;
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let header = reader
        .headers()
        .map_err(JobStoreError::storage)?
        .clone();

    let is_canonical = header.len() == CANONICAL_HEADER.len()
        && header
            .iter()
            .zip(CANONICAL_HEADER)
            .all(|(found, expected)| found.trim() == expected);
    if is_canonical {
        return Ok(());
    }

    let mut rows = Vec::new();
    for (index, parsed) in reader.records().enumerate() {
        let record = parsed.map_err(|err| JobStoreError::MalformedRecord {
            row: index + 1,
            reason: err.to_string(),
        })?;
        let row = row_from_legacy(&header, &record).map_err(|reason| {
            JobStoreError::MalformedRecord {
                row: index + 1,
                reason,
            }
        })?;
        rows.push(row);
    }

    tracing::info!(rows = rows.len(), "migrating legacy job store layout");
    write_rows(dir, &rows)
}
