//! Domain models for a submission attempt.

use chrono::Local;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::validation::{validate_contact, ValidationError};

/// Fixed prefix for generated submission identifiers.
pub const SUBMISSION_ID_PREFIX: &str = "AZ";

/// Data-URI prefix the backend expects in front of the base64 image bytes.
pub const IMAGE_DATA_URI_PREFIX: &str = "data:image/jpg;base64,";

/// Timestamp format the backend expects for `capturedate` (local time).
pub const CAPTURE_DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Contact details attached to a submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub mobile: String,
    pub email: String,
}

/// Generate a fresh submission identifier: fixed prefix plus a five-digit
/// random suffix. Collisions are accepted as negligible, not eliminated.
pub fn new_submission_id() -> String {
    let suffix: u32 = rand::rng().random_range(10_000..100_000);
    format!("{SUBMISSION_ID_PREFIX}{suffix}")
}

/// Current local time in the backend's `capturedate` format.
pub fn capture_timestamp() -> String {
    Local::now().format(CAPTURE_DATE_FORMAT).to_string()
}

/// Reasons a payload cannot be assembled.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("image data is empty")]
    EmptyImage,
}

/// Immutable submission payload, ready for upload.
///
/// Construction goes through [`SubmissionPayload::assemble`], which enforces
/// the invariant that a payload only exists with a validated contact and
/// non-empty image data. `submission_id` and `captured_at` are generated at
/// assembly time so the timestamp reflects submission, not capture.
#[derive(Clone, Debug, Serialize)]
pub struct SubmissionPayload {
    device_id: String,
    submission_id: String,
    captured_at: String,
    image_base64: String,
    contact: Contact,
}

impl SubmissionPayload {
    pub fn assemble(
        contact: Contact,
        device_id: &str,
        image_base64: String,
    ) -> Result<Self, PayloadError> {
        validate_contact(&contact)?;
        if image_base64.is_empty() {
            return Err(PayloadError::EmptyImage);
        }
        Ok(Self {
            device_id: device_id.to_string(),
            submission_id: new_submission_id(),
            captured_at: capture_timestamp(),
            image_base64,
            contact,
        })
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn submission_id(&self) -> &str {
        &self.submission_id
    }

    pub fn captured_at(&self) -> &str {
        &self.captured_at
    }

    pub fn image_base64(&self) -> &str {
        &self.image_base64
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    /// The exact wire envelope the backend expects.
    pub fn to_envelope(&self) -> SubmitEnvelope<'_> {
        SubmitEnvelope {
            params: EnvelopeParams {
                device_id: &self.device_id,
                unique_id: &self.submission_id,
                capturedate: &self.captured_at,
                image: &self.image_base64,
                name: &self.contact.name,
                mobile: &self.contact.mobile,
                email: &self.contact.email,
            },
        }
    }
}

/// Fixed JSON wrapper (`{"params": {...}}`) the backend requires.
#[derive(Debug, Serialize)]
pub struct SubmitEnvelope<'a> {
    params: EnvelopeParams<'a>,
}

/// Wire field names are a fixed backend contract; note the capitalized
/// `Email` key, which the server expects exactly as written.
#[derive(Debug, Serialize)]
struct EnvelopeParams<'a> {
    device_id: &'a str,
    unique_id: &'a str,
    capturedate: &'a str,
    image: &'a str,
    name: &'a str,
    mobile: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
}

/// Outcome of one upload, as dispatched to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadResult {
    Success { message: String },
    Failure { reason: String },
}

impl UploadResult {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadResult::Success { .. })
    }

    /// The user-visible message for either outcome.
    pub fn message(&self) -> &str {
        match self {
            UploadResult::Success { message } => message,
            UploadResult::Failure { reason } => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_contact() -> Contact {
        Contact {
            name: "Alice".to_string(),
            mobile: "9876543210".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn submission_id_shape() {
        for _ in 0..100 {
            let id = new_submission_id();
            assert!(id.starts_with(SUBMISSION_ID_PREFIX));
            let suffix = &id[SUBMISSION_ID_PREFIX.len()..];
            assert_eq!(suffix.len(), 5);
            assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn assemble_rejects_invalid_contact() {
        let contact = Contact {
            name: "ab".to_string(),
            ..valid_contact()
        };
        let err = SubmissionPayload::assemble(contact, "dev-1", "abc".to_string()).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::Validation(ValidationError::NameTooShort)
        ));
    }

    #[test]
    fn assemble_rejects_empty_image() {
        let err =
            SubmissionPayload::assemble(valid_contact(), "dev-1", String::new()).unwrap_err();
        assert!(matches!(err, PayloadError::EmptyImage));
    }

    #[test]
    fn assemble_generates_fresh_identifiers() {
        let a = SubmissionPayload::assemble(valid_contact(), "dev-1", "abc".to_string()).unwrap();
        let b = SubmissionPayload::assemble(valid_contact(), "dev-1", "abc".to_string()).unwrap();
        // Identical inputs still produce distinct submission ids; the image
        // and contact carry over unchanged.
        assert_ne!(a.submission_id(), b.submission_id());
        assert_eq!(a.image_base64(), b.image_base64());
        assert_eq!(a.contact(), b.contact());
    }

    #[test]
    fn captured_at_matches_backend_format() {
        let payload =
            SubmissionPayload::assemble(valid_contact(), "dev-1", "abc".to_string()).unwrap();
        let parsed =
            chrono::NaiveDateTime::parse_from_str(payload.captured_at(), CAPTURE_DATE_FORMAT);
        assert!(parsed.is_ok(), "unparseable: {}", payload.captured_at());
    }

    #[test]
    fn envelope_wire_keys_are_exact() {
        let payload =
            SubmissionPayload::assemble(valid_contact(), "dev-1", "abc".to_string()).unwrap();
        let value = serde_json::to_value(payload.to_envelope()).unwrap();
        let params = value.get("params").expect("params wrapper");

        for key in [
            "device_id",
            "unique_id",
            "capturedate",
            "image",
            "name",
            "mobile",
            "Email",
        ] {
            assert!(params.get(key).is_some(), "missing wire key {key}");
        }
        // The lowercase variant must not leak in alongside the contract key
        assert!(params.get("email").is_none());
        assert_eq!(params["device_id"], "dev-1");
        assert_eq!(params["Email"], "alice@example.com");
    }
}
