//! HTTP delivery of the finished envelope
//!
//! The one failure mode that must reach the caller: a run that cannot
//! report produced no observable output, so transport errors surface
//! as a distinct error type and a non-zero exit in the CLI. No retries
//! here; retry policy belongs to whoever schedules the agent.

use crate::models::Report;
use reqwest::{header, Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Delivery failure taxonomy
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Status { status: StatusCode, body: String },
}

/// Posts envelopes to the monitoring backend
pub struct Reporter {
    client: Client,
    api_url: Url,
}

impl Reporter {
    /// Build a reporter with a bounded request timeout
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, ReportError> {
        let api_url = Url::parse(api_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client, api_url })
    }

    /// POST one envelope; returns the decoded API response.
    ///
    /// An empty 2xx body is normalized into a small success object so
    /// callers always get JSON back.
    pub async fn post(&self, report: &Report) -> Result<serde_json::Value, ReportError> {
        let response = self
            .client
            .post(self.api_url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(report)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ReportError::Status { status, body });
        }

        if body.is_empty() {
            return Ok(json!({"status": "success", "code": status.as_u16()}));
        }
        Ok(serde_json::from_str(&body)
            .unwrap_or_else(|_| json!({"status": "success", "code": status.as_u16()})))
    }
}
