//! Submission encoder: payload assembly from the final image handle.

use base64::Engine;

use quizshot_core::models::{Contact, PayloadError, SubmissionPayload, IMAGE_DATA_URI_PREFIX};
use quizshot_core::validation::{validate_contact, ValidationError};

use crate::handle::ImageHandle;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("image data is empty")]
    EmptyImage,
}

pub struct SubmissionEncoder;

impl SubmissionEncoder {
    /// Assemble the upload payload. Contact validation runs before any file
    /// I/O and reports the first failing field; the submission id and
    /// timestamp are generated here, at encode time, so `capturedate`
    /// reflects submission rather than capture.
    pub async fn encode(
        handle: &ImageHandle,
        contact: &Contact,
        device_id: &str,
    ) -> Result<SubmissionPayload, EncodeError> {
        validate_contact(contact)?;

        let bytes = handle.read_bytes().await?;
        if bytes.is_empty() {
            return Err(EncodeError::EmptyImage);
        }

        let image_base64 = format!(
            "{}{}",
            IMAGE_DATA_URI_PREFIX,
            base64::engine::general_purpose::STANDARD.encode(&bytes)
        );
        tracing::debug!(
            image_bytes = bytes.len(),
            encoded_len = image_base64.len(),
            "assembled submission payload"
        );

        SubmissionPayload::assemble(contact.clone(), device_id, image_base64).map_err(|e| match e {
            PayloadError::Validation(v) => EncodeError::Validation(v),
            PayloadError::EmptyImage => EncodeError::EmptyImage,
        })
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

    #[tokio::test]
    async fn encodes_image_as_data_uri() {
        let handle = ImageHandle::from_encoded_bytes(b"\xff\xd8fakejpeg", 10, 10).unwrap();
        let payload = SubmissionEncoder::encode(&handle, &valid_contact(), "dev-1")
            .await
            .unwrap();

        assert!(payload.image_base64().starts_with(IMAGE_DATA_URI_PREFIX));
        let encoded = &payload.image_base64()[IMAGE_DATA_URI_PREFIX.len()..];
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decoded, b"\xff\xd8fakejpeg");
    }

    #[tokio::test]
    async fn validation_failure_precedes_file_io() {
        // The handle points nowhere; a validation error must still win
        let handle = ImageHandle::from_path("/nonexistent/frame.jpg", 10, 10);
        let contact = Contact {
            mobile: "123".to_string(),
            ..valid_contact()
        };
        let err = SubmissionEncoder::encode(&handle, &contact, "dev-1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EncodeError::Validation(ValidationError::InvalidMobile)
        ));
    }

    #[tokio::test]
    async fn unreadable_image_is_io_error() {
        let handle = ImageHandle::from_path("/nonexistent/frame.jpg", 10, 10);
        let err = SubmissionEncoder::encode(&handle, &valid_contact(), "dev-1")
            .await
            .unwrap_err();
        assert!(matches!(err, EncodeError::Io(_)));
    }

    #[tokio::test]
    async fn empty_image_is_rejected() {
        let handle = ImageHandle::from_encoded_bytes(b"", 10, 10).unwrap();
        let err = SubmissionEncoder::encode(&handle, &valid_contact(), "dev-1")
            .await
            .unwrap_err();
        assert!(matches!(err, EncodeError::EmptyImage));
    }

    #[tokio::test]
    async fn repeated_encode_differs_only_in_generated_fields() {
        let handle = ImageHandle::from_encoded_bytes(b"\xff\xd8fakejpeg", 10, 10).unwrap();
        let a = SubmissionEncoder::encode(&handle, &valid_contact(), "dev-1")
            .await
            .unwrap();
        let b = SubmissionEncoder::encode(&handle, &valid_contact(), "dev-1")
            .await
            .unwrap();
        assert_ne!(a.submission_id(), b.submission_id());
        assert_eq!(a.image_base64(), b.image_base64());
        assert_eq!(a.contact(), b.contact());
    }
}
