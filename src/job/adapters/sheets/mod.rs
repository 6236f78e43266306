//! Google-Sheets-backed job store.
//!
//! A thin typed client over the spreadsheet `values` REST endpoints plus a
//! [`crate::job::ports::JobStore`] implementation on top. The adapter takes
//! a ready OAuth bearer token; acquiring and refreshing credentials is the
//! caller's concern.

mod client;
mod store;

pub use client::{SheetsApiError, SheetsClient};
pub use store::SheetsJobStore;
