//! CSV flat-file job store.
//!
//! One `jobs.csv` under a capability-scoped directory, read whole and
//! rewritten through a temp file on every mutation. Legacy column layouts
//! from older revisions are migrated to the canonical schema once, when the
//! store is opened.

mod store;

pub use store::CsvJobStore;
