//! Runtime settings loaded from an optional YAML file.
//!
//! Secrets (API key, inference token) never live here; they come from the
//! environment through [`crate::cli::Cli`]. Everything else has a default, so a
//! missing file simply yields [`Settings::default`].
//!
//! ```yaml
//! platform:
//!   base_url: https://www.googleapis.com/youtube/v3
//!   comment_limit: 5
//! inference:
//!   endpoint: https://api-inference.huggingface.co
//!   summarizer:
//!     model: sshleifer/distilbart-cnn-12-6
//!     revision: a4f8f3e
//!   sentiment:
//!     model: distilbert-base-uncased-finetuned-sst-2-english
//!     revision: 714eb0f
//!   summary_min_length: 25
//!   summary_max_length: 50
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{info, instrument};

/// Accepted values for `platform.comment_limit`.
pub const COMMENT_LIMIT_RANGE: RangeInclusive<u32> = 1..=5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub platform: PlatformSettings,
    pub inference: InferenceSettings,
    /// Timeout applied to every outbound HTTP request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            platform: PlatformSettings::default(),
            inference: InferenceSettings::default(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    pub base_url: String,
    /// Maximum number of top-level comments fetched per video.
    pub comment_limit: u32,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        PlatformSettings {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            comment_limit: 5,
        }
    }
}

/// A pinned model on the inference backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub model: String,
    pub revision: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    pub endpoint: String,
    pub summarizer: ModelSpec,
    pub sentiment: ModelSpec,
    pub summary_min_length: u32,
    pub summary_max_length: u32,
    /// Longer inputs are cut before they are sent to a model.
    pub max_input_chars: usize,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        InferenceSettings {
            endpoint: "https://api-inference.huggingface.co".to_string(),
            summarizer: ModelSpec {
                model: "sshleifer/distilbart-cnn-12-6".to_string(),
                revision: "a4f8f3e".to_string(),
            },
            sentiment: ModelSpec {
                model: "distilbert-base-uncased-finetuned-sst-2-english".to_string(),
                revision: "714eb0f".to_string(),
            },
            summary_min_length: 25,
            summary_max_length: 50,
            max_input_chars: 3000,
        }
    }
}

impl Settings {
    /// Parse settings from YAML text. Missing keys fall back to defaults.
    ///
    /// # Arguments
    ///
    /// * `text` - YAML document
    /// * `path` - Where the text came from, used in error messages
    ///
    /// # Returns
    ///
    /// The parsed settings, `ConfigError::Yaml` for malformed input, or
    /// `ConfigError::OutOfRange` when `platform.comment_limit` is outside 1..=5.
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings =
            serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate(path)?;
        Ok(settings)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let limit = self.platform.comment_limit;
        if !COMMENT_LIMIT_RANGE.contains(&limit) {
            return Err(ConfigError::OutOfRange {
                path: path.to_path_buf(),
                key: "platform.comment_limit",
                value: u64::from(limit),
                min: u64::from(*COMMENT_LIMIT_RANGE.start()),
                max: u64::from(*COMMENT_LIMIT_RANGE.end()),
            });
        }
        Ok(())
    }

    /// Load settings from `path`, or defaults when no path is given.
    #[instrument(level = "info", skip_all)]
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("No config file given; using default settings");
            return Ok(Settings::default());
        };

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let settings = Self::from_yaml(&text, path)?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }
}
