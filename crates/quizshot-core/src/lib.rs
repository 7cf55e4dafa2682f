//! Core types for the quizshot submission engine.
//!
//! This crate holds the pieces shared by the processing pipeline, the backend
//! client, and the CLI: domain models (payload, contact, upload outcome),
//! contact validation, configuration, the per-install device identity, and
//! the uploader seam the pipeline submits through.

pub mod config;
pub mod device;
pub mod models;
pub mod upload;
pub mod validation;

pub use config::Config;
pub use device::DeviceIdentity;
pub use models::{Contact, PayloadError, SubmissionPayload, UploadResult};
pub use upload::{SubmitError, Uploader};
pub use validation::{validate_contact, ValidationError};
