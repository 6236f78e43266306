//! ImgBB image publisher.
//!
//! Uploads the QR PNG to the ImgBB hosting API and returns the durable
//! public URL the spreadsheet (or email) can reference.

use async_trait::async_trait;
use serde::Deserialize;

use crate::job::ports::{ImagePublishError, ImagePublisher, PublishResult, PublishedImage};

/// Production upload endpoint.
const DEFAULT_ENDPOINT: &str = "https://api.imgbb.com/1/upload";

/// Image publisher backed by the ImgBB upload API.
#[derive(Debug, Clone)]
pub struct ImgBbPublisher {
    http: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<UploadData>,
    #[serde(default)]
    error: Option<UploadError>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct UploadError {
    #[serde(default)]
    message: String,
}

impl ImgBbPublisher {
    /// Creates a publisher with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ImagePublisher for ImgBbPublisher {
    async fn publish(&self, png_bytes: &[u8], file_stem: &str) -> PublishResult<PublishedImage> {
        let part = reqwest::multipart::Part::bytes(png_bytes.to_vec())
            .file_name(format!("{file_stem}.png"))
            .mime_str("image/png")
            .map_err(ImagePublishError::transport)?;
        let form = reqwest::multipart::Form::new()
            .text("key", self.api_key.clone())
            .part("image", part);

        let response = self
            .http
            .post(DEFAULT_ENDPOINT)
            .multipart(form)
            .send()
            .await
            .map_err(ImagePublishError::transport)?;
        let body: UploadResponse = response
            .json()
            .await
            .map_err(ImagePublishError::transport)?;
        published_from(body)
    }
}

/// Maps the decoded upload response to the published URL or a rejection.
fn published_from(body: UploadResponse) -> PublishResult<PublishedImage> {
    if !body.success {
        let message = body
            .error
            .map(|err| err.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| "no error detail in response".to_owned());
        return Err(ImagePublishError::Rejected(message));
    }
    body.data
        .map(|data| PublishedImage { url: data.url })
        .ok_or_else(|| {
            ImagePublishError::Rejected("success response without image data".to_owned())
        })
}
