//! Domain methods for the contest backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quizshot_core::models::{SubmissionPayload, UploadResult};
use quizshot_core::upload::{SubmitError, Uploader};

use crate::{SubmissionClient, LATEST_PATH, RECORDS_PATH, SUBMIT_PATH};

/// Fallback reason when the backend rejects a submission without a message.
const GENERIC_REJECTION: &str = "Failed to insert data";

/// A previously graded submission, as the backend reports it. Fields are
/// optional because the backend omits them freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    #[serde(default, rename = "unique")]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub capturedate: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for the per-device record endpoints.
#[derive(Debug, Serialize)]
struct DeviceQuery<'a> {
    params: DeviceQueryParams<'a>,
}

#[derive(Debug, Serialize)]
struct DeviceQueryParams<'a> {
    device_id: &'a str,
}

impl SubmissionClient {
    /// Submit a payload for grading. One POST, no retry; the envelope's
    /// `status` decides success, and its `message` becomes the user-visible
    /// outcome either way.
    pub async fn submit(&self, payload: &SubmissionPayload) -> Result<UploadResult, SubmitError> {
        let envelope = self.post_envelope(SUBMIT_PATH, &payload.to_envelope()).await?;

        let message = envelope.message.as_str().map(str::to_string);
        if envelope.status.is_success() {
            Ok(UploadResult::Success {
                message: message.unwrap_or_else(|| "submitted".to_string()),
            })
        } else {
            Ok(UploadResult::Failure {
                reason: message.unwrap_or_else(|| GENERIC_REJECTION.to_string()),
            })
        }
    }

    /// Fetch all graded submissions for a device. A non-success status means
    /// the device has no records yet, not an error.
    pub async fn list_submissions(
        &self,
        device_id: &str,
    ) -> Result<Vec<SubmissionRecord>, SubmitError> {
        let envelope = self
            .post_envelope(
                RECORDS_PATH,
                &DeviceQuery {
                    params: DeviceQueryParams { device_id },
                },
            )
            .await?;

        if !envelope.status.is_success() {
            return Ok(Vec::new());
        }
        match envelope.message {
            serde_json::Value::Array(items) => {
                serde_json::from_value(serde_json::Value::Array(items))
                    .map_err(|_| SubmitError::MalformedResponse)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Fetch the most recent graded submission for a device, if any.
    pub async fn latest_record(
        &self,
        device_id: &str,
    ) -> Result<Option<SubmissionRecord>, SubmitError> {
        let envelope = self
            .post_envelope(
                LATEST_PATH,
                &DeviceQuery {
                    params: DeviceQueryParams { device_id },
                },
            )
            .await?;

        if !envelope.status.is_success() {
            return Ok(None);
        }
        match envelope.message {
            serde_json::Value::Array(items) => {
                let mut records: Vec<SubmissionRecord> =
                    serde_json::from_value(serde_json::Value::Array(items))
                        .map_err(|_| SubmitError::MalformedResponse)?;
                Ok(if records.is_empty() {
                    None
                } else {
                    Some(records.remove(0))
                })
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl Uploader for SubmissionClient {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<UploadResult, SubmitError> {
        SubmissionClient::submit(self, payload).await
    }
}
