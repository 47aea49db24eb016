//! Command-line interface definitions for Channel Pulse.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Secrets and the config path can be provided via environment variables.
//!
//! # Examples
//!
//! ```sh
//! # Serve the web form on the default address
//! YOUTUBE_API_KEY=... channel_pulse serve
//!
//! # Analyze one URL in the terminal and keep a JSON copy
//! channel_pulse inspect https://www.youtube.com/@rustlang -j ./reports
//!
//! # Prompt for the URL on stdin
//! channel_pulse inspect
//! ```

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// YouTube Data API v3 key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: Option<String>,

    /// Hugging Face Inference API token
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub hf_api_token: Option<String>,

    /// Optional path to a YAML settings file
    #[arg(short, long, env = "CHANNEL_PULSE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the web form
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
    },
    /// Analyze a single URL and print the report
    Inspect {
        /// Channel, user, handle or video URL; read from stdin when omitted
        url: Option<String>,

        /// Also write the report as JSON under this directory
        #[arg(short, long)]
        json_output_dir: Option<PathBuf>,
    },
}
