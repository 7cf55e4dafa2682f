//! Seam between the pipeline and the backend transport.

use async_trait::async_trait;

use crate::models::{SubmissionPayload, UploadResult};

/// Transport-level failures from a submission attempt. A malformed response
/// body is kept distinct from a failure to reach the server at all.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("malformed server response")]
    MalformedResponse,
}

/// Anything that can carry a payload to the backend. The HTTP client
/// implements this; tests substitute their own.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<UploadResult, SubmitError>;
}
