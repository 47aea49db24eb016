//! Video platform access: the [`VideoPlatform`] seam and its YouTube Data API
//! v3 implementation.
//!
//! Every query returns "first item or nothing". An empty item list is
//! `Ok(None)` and a transport or API failure is `Err(PlatformError)`; callers
//! decide how to collapse the two.
//!
//! # Queries
//!
//! | Method | Endpoint | Parameters |
//! |--------|----------|------------|
//! | [`VideoPlatform::video_channel_id`] | `videos` | `part=snippet&id=` |
//! | [`VideoPlatform::channel_id_for_username`] | `channels` | `part=id&forUsername=` |
//! | [`VideoPlatform::search_channel`] | `search` | `part=snippet&type=channel&q=&maxResults=1` |
//! | [`VideoPlatform::channel_profile`] | `channels` | `part=snippet,statistics&id=` |
//! | [`VideoPlatform::latest_video`] | `search` | `part=snippet&channelId=&order=date&type=video&maxResults=1` |
//! | [`VideoPlatform::comment_threads`] | `commentThreads` | `part=snippet&videoId=&maxResults=&textFormat=plainText` |

use crate::error::PlatformError;
use crate::models::{ChannelId, ChannelProfile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// A video as listed by the platform, before annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformVideo {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
}

/// A top-level comment as listed by the platform, before annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformComment {
    pub author: String,
    pub text: String,
}

/// Read-only queries against the video platform.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Parent channel of a video.
    async fn video_channel_id(&self, video_id: &str) -> Result<Option<ChannelId>, PlatformError>;

    /// Channel owning a legacy username.
    async fn channel_id_for_username(
        &self,
        username: &str,
    ) -> Result<Option<ChannelId>, PlatformError>;

    /// Top channel hit of a free-text search. Not an exact match guarantee.
    async fn search_channel(&self, query: &str) -> Result<Option<ChannelId>, PlatformError>;

    async fn channel_profile(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Option<ChannelProfile>, PlatformError>;

    /// Most recent video uploaded to the channel.
    async fn latest_video(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Option<PlatformVideo>, PlatformError>;

    /// Top-level comment threads in platform order.
    async fn comment_threads(
        &self,
        video_id: &str,
        max_results: u32,
    ) -> Result<Vec<PlatformComment>, PlatformError>;
}

/// YouTube Data API v3 client authenticated with an API key.
#[derive(Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl YouTubeClient {
    /// Build a client with its own connection pool.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Data API root, e.g. `https://www.googleapis.com/youtube/v3`
    /// * `api_key` - Sent as the `key` query parameter and never logged
    /// * `timeout` - Applied to every request
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(http, base_url, api_key)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, PlatformError> {
        // Url::join replaces the last segment unless the base ends in '/'.
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, resource: &str) -> Result<Url, PlatformError> {
        Ok(self.base_url.join(resource)?)
    }

    /// Run one list query and decode its `items`.
    async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, PlatformError> {
        let url = self.endpoint(resource)?;
        let t0 = Instant::now();
        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorEnvelope>().await {
                Ok(envelope) => envelope.error.message,
                Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
            };
            warn!(resource, status = status.as_u16(), %message, "Platform rejected request");
            return Err(PlatformError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ListResponse<T> = response.json().await?;
        debug!(
            resource,
            items = body.items.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Platform query finished"
        );
        Ok(body.items)
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    #[instrument(level = "info", skip_all, fields(%video_id))]
    async fn video_channel_id(&self, video_id: &str) -> Result<Option<ChannelId>, PlatformError> {
        let items: Vec<VideoItem> = self
            .list("videos", &[("part", "snippet"), ("id", video_id)])
            .await?;
        Ok(items
            .into_iter()
            .next()
            .map(|item| ChannelId::new(item.snippet.channel_id)))
    }

    #[instrument(level = "info", skip_all, fields(%username))]
    async fn channel_id_for_username(
        &self,
        username: &str,
    ) -> Result<Option<ChannelId>, PlatformError> {
        let items: Vec<ChannelIdItem> = self
            .list("channels", &[("part", "id"), ("forUsername", username)])
            .await?;
        Ok(items.into_iter().next().map(|item| ChannelId::new(item.id)))
    }

    #[instrument(level = "info", skip_all, fields(%query))]
    async fn search_channel(&self, query: &str) -> Result<Option<ChannelId>, PlatformError> {
        let items: Vec<SearchItem> = self
            .list(
                "search",
                &[
                    ("part", "snippet"),
                    ("type", "channel"),
                    ("q", query),
                    ("maxResults", "1"),
                ],
            )
            .await?;
        Ok(items
            .into_iter()
            .next()
            .map(|item| ChannelId::new(item.snippet.channel_id)))
    }

    #[instrument(level = "info", skip_all, fields(channel_id = %channel_id))]
    async fn channel_profile(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Option<ChannelProfile>, PlatformError> {
        let items: Vec<ChannelItem> = self
            .list(
                "channels",
                &[("part", "snippet,statistics"), ("id", channel_id.as_str())],
            )
            .await?;
        Ok(items.into_iter().next().map(ChannelItem::into_profile))
    }

    #[instrument(level = "info", skip_all, fields(channel_id = %channel_id))]
    async fn latest_video(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Option<PlatformVideo>, PlatformError> {
        let items: Vec<SearchItem> = self
            .list(
                "search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id.as_str()),
                    ("order", "date"),
                    ("type", "video"),
                    ("maxResults", "1"),
                ],
            )
            .await?;
        Ok(items.into_iter().next().and_then(SearchItem::into_video))
    }

    #[instrument(level = "info", skip_all, fields(%video_id, max_results))]
    async fn comment_threads(
        &self,
        video_id: &str,
        max_results: u32,
    ) -> Result<Vec<PlatformComment>, PlatformError> {
        let max_results = max_results.to_string();
        let items: Vec<CommentThreadItem> = self
            .list(
                "commentThreads",
                &[
                    ("part", "snippet"),
                    ("videoId", video_id),
                    ("maxResults", max_results.as_str()),
                    ("textFormat", "plainText"),
                ],
            )
            .await?;
        Ok(items
            .into_iter()
            .map(CommentThreadItem::into_comment)
            .collect())
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    channel_id: String,
}

#[derive(Debug, Deserialize)]
struct ChannelIdItem {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    id: SearchId,
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    published_at: DateTime<Utc>,
}

impl SearchItem {
    /// Search hits that are not videos carry no `videoId`.
    fn into_video(self) -> Option<PlatformVideo> {
        let video_id = self.id.video_id?;
        Some(PlatformVideo {
            video_id,
            title: self.snippet.title,
            description: self.snippet.description,
            published_at: self.snippet.published_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    snippet: ChannelSnippet,
    #[serde(default)]
    statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
    #[serde(default)]
    description: String,
}

/// Counters arrive as decimal strings; hidden ones are absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    subscriber_count: Option<String>,
    view_count: Option<String>,
}

impl ChannelItem {
    fn into_profile(self) -> ChannelProfile {
        let parse = |count: Option<String>| count.and_then(|c| c.parse::<u64>().ok());
        let (subscriber_count, view_count) = match self.statistics {
            Some(stats) => (parse(stats.subscriber_count), parse(stats.view_count)),
            None => (None, None),
        };
        ChannelProfile {
            title: self.snippet.title,
            description: self.snippet.description,
            subscriber_count,
            view_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadItem {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    author_display_name: String,
    text_display: String,
}

impl CommentThreadItem {
    fn into_comment(self) -> PlatformComment {
        let snippet = self.snippet.top_level_comment.snippet;
        PlatformComment {
            author: snippet.author_display_name,
            text: snippet.text_display,
        }
    }
}
