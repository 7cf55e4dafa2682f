//! quizshot CLI — submit a photographed quiz entry and check past results.
//!
//! Set QUIZSHOT_API_URL to target a non-production backend.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use quizshot_cli::{format_record, init_tracing};
use quizshot_client::SubmissionClient;
use quizshot_core::{Config, Contact, DeviceIdentity};
use quizshot_processing::{
    CompressorConfig, FileCapture, ImageCropTool, SubmissionPipeline,
};

#[derive(Parser)]
#[command(name = "quizshot", about = "Quiz entry submission CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a photographed quiz entry
    Submit {
        /// Path to the photographed entry
        image: PathBuf,
        /// Contact name (at least 3 characters)
        #[arg(long)]
        name: String,
        /// 10-digit mobile number
        #[arg(long)]
        mobile: String,
        /// Email address
        #[arg(long)]
        email: String,
    },
    /// List graded submissions for this device
    History,
    /// Show the most recent graded submission for this device
    Latest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let device_id =
        DeviceIdentity::load_or_create(&config.state_dir, config.device_id_override.as_deref())
            .context("Failed to resolve device identity")?;
    let client = SubmissionClient::new(config.api_base_url.clone())?;

    match cli.command {
        Commands::Submit {
            image,
            name,
            mobile,
            email,
        } => {
            let contact = Contact {
                name,
                mobile,
                email,
            };
            let mut pipeline = SubmissionPipeline::new(
                Arc::new(FileCapture::new(image)),
                Arc::new(ImageCropTool),
                CompressorConfig::from(&config),
                config.target_aspect,
                Arc::new(client),
            );

            pipeline.capture().await.context("Capture failed")?;
            let result = pipeline
                .submit(&contact, device_id.as_str())
                .await
                .context("Submission failed")?;

            if result.is_success() {
                println!("Submitted: {}", result.message());
            } else {
                println!("Rejected: {}", result.message());
                std::process::exit(1);
            }
        }
        Commands::History => {
            let records = client.list_submissions(device_id.as_str()).await?;
            if records.is_empty() {
                println!("No submissions found for this device.");
            } else {
                for record in &records {
                    println!("{}", format_record(record));
                }
            }
        }
        Commands::Latest => match client.latest_record(device_id.as_str()).await? {
            Some(record) => println!("{}", format_record(&record)),
            None => println!("No recent submission found."),
        },
    }

    Ok(())
}
