//! # Channel Pulse
//!
//! Resolves a YouTube channel from any channel, user, handle or video URL,
//! fetches the channel profile and its latest video with the top comments,
//! and annotates the video description and every comment with a short
//! summary and a sentiment label from pretrained models.
//!
//! ## Usage
//!
//! ```sh
//! channel_pulse serve --bind 127.0.0.1:5000
//! channel_pulse inspect https://www.youtube.com/@rustlang
//! ```
//!
//! ## Architecture
//!
//! Every request runs the same linear pipeline:
//! 1. **Resolve**: classify the URL and look up the canonical channel id
//! 2. **Fetch**: channel profile and latest video, concurrently
//! 3. **Comments**: up to five top-level comments of that video
//! 4. **Annotate**: summary + sentiment for the description and each comment
//! 5. **Render**: HTML page, console text, or JSON

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod annotate;
mod cli;
mod config;
mod error;
mod identity;
mod inference;
mod models;
mod outputs;
mod pipeline;
mod resolver;
#[cfg(test)]
mod testing;
mod utils;
mod web;
mod youtube;

use annotate::Annotator;
use cli::{Cli, Command};
use config::Settings;
use error::PlatformError;
use inference::{HuggingFaceSentiment, HuggingFaceSummarizer, InferenceClient};
use outputs::{html::INVALID_URL_MESSAGE, json, text};
use pipeline::Pipeline;
use youtube::YouTubeClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("channel_pulse starting up");

    let args = Cli::parse();
    debug!(config = ?args.config, command = ?args.command, "Parsed CLI arguments");

    let settings = Settings::load(args.config.as_deref()).await?;
    let pipeline = build_pipeline(&settings, args.youtube_api_key, args.hf_api_token)?;

    match args.command {
        Command::Serve { bind } => {
            web::serve(pipeline, bind).await?;
        }
        Command::Inspect {
            url,
            json_output_dir,
        } => {
            let url = match url {
                Some(url) => url,
                None => prompt_for_url().await?,
            };
            inspect(&pipeline, &url, json_output_dir.as_deref()).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(())
}

/// Construct the platform client and both model backends once for the
/// lifetime of the process.
fn build_pipeline(
    settings: &Settings,
    youtube_api_key: Option<String>,
    hf_api_token: Option<String>,
) -> Result<Pipeline, Box<dyn Error>> {
    let api_key = youtube_api_key.ok_or_else(|| PlatformError::MissingApiKey {
        env_var: "YOUTUBE_API_KEY".to_string(),
    })?;
    let timeout = Duration::from_secs(settings.request_timeout_secs);

    let platform = YouTubeClient::new(&settings.platform.base_url, api_key, timeout)?;
    info!(?platform, "Platform client ready");

    if hf_api_token.is_none() {
        info!("HF_API_TOKEN not set; calling the inference endpoint anonymously");
    }
    let inference = InferenceClient::new(&settings.inference, hf_api_token, timeout)?;
    let summarizer = HuggingFaceSummarizer::new(inference.clone(), &settings.inference);
    let classifier = HuggingFaceSentiment::new(inference, &settings.inference);

    Ok(Pipeline::new(
        Arc::new(platform),
        Annotator::new(Arc::new(summarizer), Arc::new(classifier)),
        settings.platform.comment_limit,
    ))
}

async fn prompt_for_url() -> Result<String, Box<dyn Error>> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"Enter the YouTube URL (channel, user, handle, or video): ")
        .await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line.trim().to_string())
}

/// Console flow: run the pipeline once, print the report, optionally export it.
async fn inspect(
    pipeline: &Pipeline,
    url: &str,
    json_output_dir: Option<&std::path::Path>,
) -> Result<(), Box<dyn Error>> {
    let report = match pipeline.report(url).await {
        Ok(report) => report,
        Err(e) => {
            error!(%url, error = %e, "Channel not found");
            println!("{INVALID_URL_MESSAGE}: channel not found.");
            return Ok(());
        }
    };

    print!("{}", text::render_report(&report));

    if let Some(dir) = json_output_dir {
        let path = json::write_report(&report, dir).await?;
        println!("\nReport written to {}", path.display());
    }
    Ok(())
}
