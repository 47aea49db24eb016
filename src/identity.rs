//! Channel identity lookup: turn a routing key into a canonical channel id.
//!
//! Each strategy runs exactly one platform query and unwraps its first item.
//! "Zero items" becomes [`LookupError::NotFound`] and a request failure
//! becomes [`LookupError::Platform`]; the resolver treats both the same way.

use crate::error::LookupError;
use crate::models::ChannelId;
use crate::youtube::VideoPlatform;
use tracing::{debug, instrument};

/// Parent channel of a video.
#[instrument(level = "info", skip(platform))]
pub async fn from_video(
    platform: &dyn VideoPlatform,
    video_id: &str,
) -> Result<ChannelId, LookupError> {
    let channel_id = platform
        .video_channel_id(video_id)
        .await?
        .ok_or_else(|| LookupError::not_found("video", video_id))?;
    debug!(%channel_id, "Resolved channel from video");
    Ok(channel_id)
}

/// Channel owning a legacy `/user/` name.
#[instrument(level = "info", skip(platform))]
pub async fn from_username(
    platform: &dyn VideoPlatform,
    username: &str,
) -> Result<ChannelId, LookupError> {
    let channel_id = platform
        .channel_id_for_username(username)
        .await?
        .ok_or_else(|| LookupError::not_found("channel for username", username))?;
    debug!(%channel_id, "Resolved channel from username");
    Ok(channel_id)
}

/// Channel for an `@handle`, via a channel-scoped search for `@{handle}`.
///
/// The platform search is ranked, not exact: the top hit is usually the
/// handle's owner but is not guaranteed to be.
#[instrument(level = "info", skip(platform))]
pub async fn from_handle(
    platform: &dyn VideoPlatform,
    handle: &str,
) -> Result<ChannelId, LookupError> {
    let query = format!("@{handle}");
    let channel_id = platform
        .search_channel(&query)
        .await?
        .ok_or_else(|| LookupError::not_found("channel for handle", query.clone()))?;
    debug!(%channel_id, "Resolved channel from handle search");
    Ok(channel_id)
}
