//! HTTP client for the quizshot contest backend.
//!
//! Provides a minimal client over the backend's three endpoints (submit,
//! per-device records, latest record) and the response-envelope decoding
//! they share. The CLI and the pipeline use this client directly; it also
//! implements the core [`Uploader`] seam.
//!
//! [`Uploader`]: quizshot_core::Uploader

pub mod api;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use quizshot_core::upload::SubmitError;

/// Endpoint paths, appended to the configured base URL. `getlastest_record`
/// is the backend's own spelling.
pub(crate) const SUBMIT_PATH: &str = "/imagecrack";
pub(crate) const RECORDS_PATH: &str = "/imagedetails";
pub(crate) const LATEST_PATH: &str = "/getlastest_record";

const DEFAULT_BASE_URL: &str = "https://api.eenadu.net/EenaduQuizApi/api";

/// HTTP client for the contest backend.
#[derive(Clone, Debug)]
pub struct SubmissionClient {
    client: Client,
    base_url: String,
}

impl SubmissionClient {
    /// Build a client against a base URL. Timeouts stay at transport
    /// defaults; the backend is slow when grading rushes in.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the environment: QUIZSHOT_API_URL, defaulting to
    /// the production backend.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("QUIZSHOT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and decode the shared `{status, message}` envelope.
    /// The body is read as text first: the backend answers non-JSON on some
    /// error paths, and that must stay distinguishable from not reaching the
    /// server at all.
    pub(crate) async fn post_envelope<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ResponseEnvelope, SubmitError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let text = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        serde_json::from_str(&text).map_err(|_| {
            tracing::warn!(path, body_len = text.len(), "undecodable response body");
            SubmitError::MalformedResponse
        })
    }
}

/// Backend `status` field: arrives as a string or a number depending on the
/// endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Status {
    Number(i64),
    Text(String),
}

impl Status {
    pub fn is_success(&self) -> bool {
        match self {
            Status::Number(n) => *n == 1,
            Status::Text(s) => s == "1" || s == "success",
        }
    }
}

/// Shared response envelope. `message` is a string on the submit endpoint
/// and an array on the record endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseEnvelope {
    pub status: Status,
    #[serde(default)]
    pub message: serde_json::Value,
}

pub use api::SubmissionRecord;
