use quizshot_client::SubmissionRecord;

/// Render one record as a fixed-order line: id, capture date, status.
pub fn format_record(record: &SubmissionRecord) -> String {
    format!(
        "{}  {}  {}",
        record.unique_id.as_deref().unwrap_or("-"),
        record.capturedate.as_deref().unwrap_or("-"),
        record.status.as_deref().unwrap_or("-"),
    )
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
