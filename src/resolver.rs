//! URL classification and channel resolution.
//!
//! A submitted URL is matched against four shapes in a fixed priority order;
//! the first match wins:
//!
//! | Priority | Pattern | Routing key | Next step |
//! |----------|---------|-------------|-----------|
//! | 1 | `youtube.com/watch?v=` | video id, up to the next `&` | [`identity::from_video`] |
//! | 2 | `youtube.com/channel/` | trailing segment | is the channel id |
//! | 3 | `youtube.com/user/` | trailing segment | [`identity::from_username`] |
//! | 4 | `youtube.com/@` | text after the last `@` | [`identity::from_handle`] |
//!
//! Anything else is [`ResolveError::Unrecognized`]. Every lookup failure
//! collapses to [`ResolveError::NotFound`] with the cause attached for logs.

use crate::error::ResolveError;
use crate::identity;
use crate::models::ChannelId;
use crate::youtube::VideoPlatform;
use tracing::{info, instrument, warn};

const WATCH_MARKER: &str = "youtube.com/watch?v=";
const CHANNEL_MARKER: &str = "youtube.com/channel/";
const USER_MARKER: &str = "youtube.com/user/";
const HANDLE_MARKER: &str = "youtube.com/@";

/// Recognized URL shape with its extracted routing key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlShape {
    Video(String),
    Channel(String),
    User(String),
    Handle(String),
}

impl UrlShape {
    /// Classify `url` without touching the network.
    pub fn classify(url: &str) -> Result<Self, ResolveError> {
        let url = url.trim();
        let shape = if let Some((_, rest)) = url.split_once(WATCH_MARKER) {
            let video_id = rest.split('&').next().unwrap_or_default();
            UrlShape::Video(video_id.trim().to_string())
        } else if let Some((_, rest)) = url.split_once(CHANNEL_MARKER) {
            UrlShape::Channel(trailing_segment(rest))
        } else if let Some((_, rest)) = url.split_once(USER_MARKER) {
            UrlShape::User(trailing_segment(rest))
        } else if url.contains(HANDLE_MARKER) {
            let handle = url.rsplit('@').next().unwrap_or_default();
            UrlShape::Handle(trailing_segment(handle))
        } else {
            return Err(ResolveError::Unrecognized(url.to_string()));
        };

        if shape.key().is_empty() {
            return Err(ResolveError::Unrecognized(url.to_string()));
        }
        Ok(shape)
    }

    pub fn key(&self) -> &str {
        match self {
            UrlShape::Video(key)
            | UrlShape::Channel(key)
            | UrlShape::User(key)
            | UrlShape::Handle(key) => key,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            UrlShape::Video(_) => "video",
            UrlShape::Channel(_) => "channel",
            UrlShape::User(_) => "user",
            UrlShape::Handle(_) => "handle",
        }
    }
}

/// Path text up to the next `/`, `?` or `#`, trimmed.
fn trailing_segment(rest: &str) -> String {
    rest.split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Resolve a submitted URL to a channel id.
///
/// # Arguments
///
/// * `platform` - Used for the video, username and handle lookups
/// * `url` - Raw user input; surrounding whitespace is ignored
///
/// # Returns
///
/// The canonical channel id, `ResolveError::Unrecognized` when no URL shape
/// matches, or `ResolveError::NotFound` carrying the failed lookup.
#[instrument(level = "info", skip(platform))]
pub async fn resolve_channel_id(
    platform: &dyn VideoPlatform,
    url: &str,
) -> Result<ChannelId, ResolveError> {
    let shape = match UrlShape::classify(url) {
        Ok(shape) => shape,
        Err(e) => {
            warn!(error = %e, "Rejected URL");
            return Err(e);
        }
    };

    let resolved = match &shape {
        UrlShape::Video(video_id) => identity::from_video(platform, video_id).await,
        UrlShape::Channel(channel_id) => Ok(ChannelId::new(channel_id.as_str())),
        UrlShape::User(username) => identity::from_username(platform, username).await,
        UrlShape::Handle(handle) => identity::from_handle(platform, handle).await,
    };

    match resolved {
        Ok(channel_id) => {
            info!(kind = shape.kind(), key = shape.key(), %channel_id, "Resolved channel");
            Ok(channel_id)
        }
        Err(e) => {
            warn!(kind = shape.kind(), key = shape.key(), error = %e, "Channel lookup failed");
            Err(ResolveError::NotFound(e))
        }
    }
}
