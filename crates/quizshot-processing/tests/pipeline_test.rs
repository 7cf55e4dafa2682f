//! End-to-end pipeline tests: a staged photograph travels capture → crop →
//! compress → encode → upload against a mocked backend.

use std::path::Path;
use std::sync::Arc;

use image::{ImageFormat, Rgba, RgbaImage};
use mockito::Matcher;

use quizshot_client::SubmissionClient;
use quizshot_core::models::{Contact, UploadResult};
use quizshot_core::upload::SubmitError;
use quizshot_processing::{
    CompressorConfig, FileCapture, ImageCropTool, PipelineError, PipelineState, SubmissionPipeline,
};

fn write_entry_photo(path: &Path, width: u32, height: u32) {
    let mut img = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = ((x ^ y) % 255) as u8;
            img.put_pixel(x, y, Rgba([v, v / 2, 255 - v, 255]));
        }
    }
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

fn contact() -> Contact {
    Contact {
        name: "Alice".to_string(),
        mobile: "9876543210".to_string(),
        email: "alice@example.com".to_string(),
    }
}

fn pipeline_for(source: &Path, base_url: &str) -> SubmissionPipeline {
    SubmissionPipeline::new(
        Arc::new(FileCapture::new(source)),
        Arc::new(ImageCropTool),
        CompressorConfig::default(),
        0.75,
        Arc::new(SubmissionClient::new(base_url).unwrap()),
    )
}

#[tokio::test]
async fn accepted_submission_reaches_done() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/imagecrack")
        .match_header("content-type", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(serde_json::json!({
                "params": {
                    "device_id": "device-e2e",
                    "name": "Alice",
                    "mobile": "9876543210",
                    "Email": "alice@example.com"
                }
            })),
            // The image travels as a base64 data URI
            Matcher::Regex("data:image/jpg;base64,".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"status":"1","message":"ok"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("entry.png");
    write_entry_photo(&photo, 900, 900);

    let mut pipeline = pipeline_for(&photo, &server.url());
    pipeline.capture().await.unwrap();
    let result = pipeline.submit(&contact(), "device-e2e").await.unwrap();

    assert_eq!(
        result,
        UploadResult::Success {
            message: "ok".to_string()
        }
    );
    assert_eq!(pipeline.state(), PipelineState::Done);
    mock.assert_async().await;
}

#[tokio::test]
async fn rejected_submission_reaches_failed_with_reason() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/imagecrack")
        .with_status(200)
        .with_body(r#"{"status":"0","message":"missing field"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("entry.png");
    write_entry_photo(&photo, 600, 800);

    let mut pipeline = pipeline_for(&photo, &server.url());
    pipeline.capture().await.unwrap();
    let result = pipeline.submit(&contact(), "device-e2e").await.unwrap();

    assert_eq!(
        result,
        UploadResult::Failure {
            reason: "missing field".to_string()
        }
    );
    assert_eq!(pipeline.state(), PipelineState::Failed);
}

#[tokio::test]
async fn non_json_response_fails_as_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/imagecrack")
        .with_status(200)
        .with_body("service temporarily unavailable")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("entry.png");
    write_entry_photo(&photo, 600, 800);

    let mut pipeline = pipeline_for(&photo, &server.url());
    pipeline.capture().await.unwrap();
    let err = pipeline.submit(&contact(), "device-e2e").await.unwrap_err();

    // Malformed body and unreachable server stay distinguishable
    assert!(matches!(
        err,
        PipelineError::Submit(SubmitError::MalformedResponse)
    ));
    assert_eq!(pipeline.state(), PipelineState::Failed);
}

#[tokio::test]
async fn unreachable_backend_fails_as_transport() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("entry.png");
    write_entry_photo(&photo, 600, 800);

    let mut pipeline = pipeline_for(&photo, "http://127.0.0.1:9");
    pipeline.capture().await.unwrap();
    let err = pipeline.submit(&contact(), "device-e2e").await.unwrap_err();

    assert!(matches!(err, PipelineError::Submit(SubmitError::Transport(_))));
    assert_eq!(pipeline.state(), PipelineState::Failed);
}

#[tokio::test]
async fn retake_then_resubmit_is_a_fresh_attempt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/imagecrack")
        .with_status(200)
        .with_body(r#"{"status":"1","message":"ok"}"#)
        // Only the second attempt ever uploads
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("entry.png");
    write_entry_photo(&photo, 600, 800);

    let mut pipeline = pipeline_for(&photo, &server.url());
    pipeline.capture().await.unwrap();
    pipeline.retake();
    assert_eq!(pipeline.state(), PipelineState::Idle);

    pipeline.capture().await.unwrap();
    let result = pipeline.submit(&contact(), "device-e2e").await.unwrap();
    assert!(result.is_success());
    mock.assert_async().await;
}
