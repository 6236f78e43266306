//! Minimal typed client for the spreadsheet `values` REST endpoints.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Production endpoint for the Sheets v4 API.
const DEFAULT_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// How cell input is interpreted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ValueInput {
    /// Values stored verbatim.
    Raw,
    /// Values parsed as if typed by a user, so `=IMAGE(...)` becomes a
    /// rendered formula.
    UserEntered,
}

impl ValueInput {
    const fn query_value(self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::UserEntered => "USER_ENTERED",
        }
    }
}

/// Errors returned by the sheets client.
#[derive(Debug, Clone, Error)]
pub enum SheetsApiError {
    /// Transport-level failure reaching the API.
    #[error("sheets API unreachable: {0}")]
    Transport(Arc<reqwest::Error>),

    /// The API answered with a non-success status.
    #[error("sheets API returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, for operator diagnostics.
        body: String,
    },
}

impl From<reqwest::Error> for SheetsApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Arc::new(err))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct ValueRangeBody {
    values: Vec<Vec<String>>,
}

/// Typed wrapper over the `values` endpoints of one spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    spreadsheet_id: String,
    access_token: String,
}

impl SheetsClient {
    /// Creates a client for one spreadsheet with a ready bearer token.
    #[must_use]
    pub fn new(spreadsheet_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
        }
    }

    fn range_url(&self, range: &str) -> String {
        format!("{DEFAULT_ENDPOINT}/{}/values/{range}", self.spreadsheet_id)
    }

    /// Reads all cell values in `range`.
    pub(super) async fn values_get(&self, range: &str) -> Result<Vec<Vec<String>>, SheetsApiError> {
        let response = self
            .http
            .get(self.range_url(range))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let body: ValueRange = check_status(response).await?.json().await?;
        Ok(body.values)
    }

    /// Appends one row after the last data row of `range`.
    pub(super) async fn values_append(
        &self,
        range: &str,
        row: Vec<String>,
        input: ValueInput,
    ) -> Result<(), SheetsApiError> {
        let url = format!(
            "{}:append?valueInputOption={}",
            self.range_url(range),
            input.query_value()
        );
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&ValueRangeBody { values: vec![row] })
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    /// Overwrites the cells of `range` with one row.
    pub(super) async fn values_update(
        &self,
        range: &str,
        row: Vec<String>,
        input: ValueInput,
    ) -> Result<(), SheetsApiError> {
        let url = format!(
            "{}?valueInputOption={}",
            self.range_url(range),
            input.query_value()
        );
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&ValueRangeBody { values: vec![row] })
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }
}

/// Maps non-success statuses to [`SheetsApiError::Api`] with the body text.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SheetsApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SheetsApiError::Api {
        status: status.as_u16(),
        body,
    })
}
