//! Client for the report-generation endpoint
//!
//! The endpoint takes a multipart upload of the transaction export and
//! answers with a zip archive of PDF reports, one per currency.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::api::error::{SubmissionError, GENERIC_UPLOAD_FAILURE};
use crate::config::ApiConfig;

/// Path of the report endpoint relative to the API base URL
pub const REPORT_PATH: &str = "/report/pdf-zip";

/// Multipart field name the endpoint reads the upload from
pub const FILE_FIELD: &str = "file";

const UPLOAD_MIME: &str = "text/csv";

/// Everything one request needs, detached from the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub file_name: String,
    pub content: Bytes,
    /// Already validated four-digit year, if any
    pub year: Option<String>,
}

/// Seam between the submission controller and the network
#[async_trait]
pub trait ReportClient: Send + Sync {
    /// Full URL requests are sent to (shown as a hint in the UI)
    fn endpoint(&self) -> String;

    /// Issue exactly one request. Never retries.
    async fn generate(&self, request: ReportRequest) -> Result<Bytes, SubmissionError>;
}

/// reqwest-backed client
pub struct HttpReportClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpReportClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("coinmotion-report/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(
            api.base_url.clone(),
            Duration::from_secs(api.request_timeout_secs),
        )
    }
}

/// Join a base URL and the report path without doubling slashes
pub fn endpoint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), REPORT_PATH)
}

#[async_trait]
impl ReportClient for HttpReportClient {
    fn endpoint(&self) -> String {
        endpoint_url(&self.base_url)
    }

    async fn generate(&self, request: ReportRequest) -> Result<Bytes, SubmissionError> {
        let url = self.endpoint();
        let size = request.content.len();

        let part = Part::bytes(request.content.to_vec())
            .file_name(request.file_name.clone())
            .mime_str(UPLOAD_MIME)
            .map_err(|e| SubmissionError::transport(e.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);

        let mut builder = self.client.post(&url).multipart(form);
        if let Some(year) = &request.year {
            builder = builder.query(&[("year", year.as_str())]);
        }

        tracing::debug!(%url, file = %request.file_name, size, year = ?request.year, "Sending report request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, %url, "Report request failed before a response arrived");
            SubmissionError::transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await.map_err(|e| {
                tracing::warn!(error = %e, "Failed to read report archive body");
                SubmissionError::transport(e.to_string())
            })?;
            tracing::debug!(status = status.as_u16(), bytes = body.len(), "Report archive received");
            return Ok(body);
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        // An unreadable error body is treated like an empty one
        let text = response.text().await.unwrap_or_default();

        tracing::debug!(status = status.as_u16(), is_json, "Report endpoint returned an error");
        Err(SubmissionError::remote(
            status.as_u16(),
            error_message_from_body(is_json, &text),
        ))
    }
}

/// Turn a non-success response body into the message shown to the user.
///
/// JSON bodies are searched for a `detail` field, either a string or a list
/// of `{ "msg": ... }` objects. Anything else falls back to the raw text,
/// and an empty body to the generic message.
pub fn error_message_from_body(is_json: bool, body: &str) -> String {
    if is_json {
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            return detail_message(&value).unwrap_or_else(|| GENERIC_UPLOAD_FAILURE.to_string());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        GENERIC_UPLOAD_FAILURE.to_string()
    } else {
        trimmed.to_string()
    }
}

fn detail_message(value: &Value) -> Option<String> {
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
