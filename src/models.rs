//! Data models for a channel report.
//!
//! Everything here is request-scoped: built fresh for each submitted URL,
//! handed to a renderer, and dropped.
//!
//! - [`ChannelId`]: canonical platform id of a channel
//! - [`ChannelProfile`]: title, description and public statistics
//! - [`VideoRecord`]: the latest video with its annotated description
//! - [`CommentRecord`]: one annotated top-level comment
//! - [`ChannelReport`]: the aggregate handed to the presentation layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author shown on the placeholder record for a video without comments.
pub const NO_COMMENTS_AUTHOR: &str = "No comments";
/// Text shown on the placeholder record for a video without comments.
pub const NO_COMMENTS_TEXT: &str = "No comments available.";

/// Opaque channel identifier as issued by the platform (e.g. `UC...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        ChannelId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only snapshot of a channel's public metadata.
///
/// The platform hides subscriber counts for some channels, so both counters
/// are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub title: String,
    pub description: String,
    pub subscriber_count: Option<u64>,
    pub view_count: Option<u64>,
}

/// Sentiment labels of the pinned SST-2 classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    /// Parse a backend label, case-insensitively.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" | "LABEL_1" => Some(SentimentLabel::Positive),
            "NEGATIVE" | "LABEL_0" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification: a label and its confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f32,
}

/// One top-level comment and its annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub author: String,
    pub text: String,
    pub summarized_comment: Option<String>,
    pub sentiment: Option<SentimentResult>,
}

impl CommentRecord {
    /// The record emitted in place of an empty comment list.
    pub fn placeholder() -> Self {
        CommentRecord {
            author: NO_COMMENTS_AUTHOR.to_string(),
            text: NO_COMMENTS_TEXT.to_string(),
            summarized_comment: None,
            sentiment: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.author == NO_COMMENTS_AUTHOR
            && self.text == NO_COMMENTS_TEXT
            && self.summarized_comment.is_none()
            && self.sentiment.is_none()
    }
}

/// The most recent video of a channel, fully annotated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub summarized_description: Option<String>,
    pub sentiment: Option<SentimentResult>,
    pub comments: Vec<CommentRecord>,
}

impl VideoRecord {
    pub fn watch_url(&self) -> String {
        format!(
            "https://www.youtube.com/watch?v={}",
            urlencoding::encode(&self.video_id)
        )
    }
}

/// Everything gathered for one resolved channel.
///
/// `profile` and `video` are independent: either may be missing when its
/// fetch failed after the channel id was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReport {
    pub channel_id: ChannelId,
    pub profile: Option<ChannelProfile>,
    pub video: Option<VideoRecord>,
}
