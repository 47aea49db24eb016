//! Error types for each stage of the pipeline.
//!
//! Every external call returns one of these typed errors. Nothing here is
//! fatal to the process: the presentation boundary logs the cause and turns it
//! into a user-facing outcome ("Invalid YouTube URL", a missing section, or a
//! missing annotation).

use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to the video platform.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Transport or decode failure. The request URL is stripped because it
    /// carries the API key.
    #[error("platform request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("platform returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid platform endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },
}

impl From<reqwest::Error> for PlatformError {
    fn from(e: reqwest::Error) -> Self {
        PlatformError::Http(e.without_url())
    }
}

/// Outcome of a single lookup or fetch that did not produce data.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("no {what} found for {key}")]
    NotFound { what: &'static str, key: String },

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl LookupError {
    pub fn not_found(what: &'static str, key: impl Into<String>) -> Self {
        LookupError::NotFound {
            what,
            key: key.into(),
        }
    }
}

/// Why a URL could not be turned into a channel id.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("unrecognized YouTube URL format: {0}")]
    Unrecognized(String),

    #[error("channel could not be resolved")]
    NotFound(#[source] LookupError),
}

/// Failure of the summarization or sentiment backend.
#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("input text is empty")]
    EmptyInput,

    #[error("inference request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid inference endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("inference backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("unexpected inference response: {0}")]
    UnexpectedResponse(String),

    #[error("unknown sentiment label: {0}")]
    UnknownLabel(String),
}

/// Failure loading the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config file {path}: {key} must be between {min} and {max}, got {value}")]
    OutOfRange {
        path: PathBuf,
        key: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}
