//! The aggregation pipeline: resolve → profile + latest video → comments →
//! annotation.
//!
//! [`Pipeline`] owns the three long-lived service handles (platform client,
//! summarizer, sentiment classifier) and is cheap to clone into request
//! handlers. Each stage returns a typed result; [`Pipeline::report`] is the
//! boundary that logs failures and turns them into missing sections.

use crate::annotate::Annotator;
use crate::error::{LookupError, PlatformError, ResolveError};
use crate::models::{ChannelId, ChannelProfile, ChannelReport, CommentRecord, VideoRecord};
use crate::resolver::resolve_channel_id;
use crate::youtube::VideoPlatform;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Comments annotated at the same time. Output order is unaffected.
const ANNOTATION_CONCURRENCY: usize = 5;

#[derive(Clone)]
pub struct Pipeline {
    platform: Arc<dyn VideoPlatform>,
    annotator: Annotator,
    comment_limit: u32,
}

impl Pipeline {
    /// # Arguments
    ///
    /// * `platform` - Video platform queried for every stage
    /// * `annotator` - Summary and sentiment backends
    /// * `comment_limit` - Top-level comments kept per video, already validated
    ///   by [`crate::config::Settings`]
    pub fn new(platform: Arc<dyn VideoPlatform>, annotator: Annotator, comment_limit: u32) -> Self {
        Self {
            platform,
            annotator,
            comment_limit,
        }
    }

    pub async fn resolve(&self, url: &str) -> Result<ChannelId, ResolveError> {
        resolve_channel_id(self.platform.as_ref(), url).await
    }

    /// Title, description and statistics of a channel.
    #[instrument(level = "info", skip_all, fields(%channel_id))]
    pub async fn fetch_channel_profile(
        &self,
        channel_id: &ChannelId,
    ) -> Result<ChannelProfile, LookupError> {
        self.platform
            .channel_profile(channel_id)
            .await?
            .ok_or_else(|| LookupError::not_found("channel", channel_id.as_str()))
    }

    /// Most recent video of a channel, with annotated description and comments.
    ///
    /// The description annotation and the comment fetch run concurrently.
    ///
    /// # Arguments
    ///
    /// * `channel_id` - Canonical id from [`Pipeline::resolve`]
    ///
    /// # Returns
    ///
    /// The annotated [`VideoRecord`]. A channel without videos is
    /// `LookupError::NotFound`. A failed comment request leaves `comments`
    /// empty instead of failing the video.
    #[instrument(level = "info", skip_all, fields(%channel_id))]
    pub async fn fetch_latest_video(
        &self,
        channel_id: &ChannelId,
    ) -> Result<VideoRecord, LookupError> {
        let video = self
            .platform
            .latest_video(channel_id)
            .await?
            .ok_or_else(|| LookupError::not_found("videos for channel", channel_id.as_str()))?;
        info!(video_id = %video.video_id, title = %video.title, "Found latest video");

        let (annotation, comments) = tokio::join!(
            self.annotator.annotate(&video.description),
            self.fetch_comments(&video.video_id)
        );
        let comments = comments.unwrap_or_else(|e| {
            warn!(video_id = %video.video_id, error = %e, "Comments unavailable");
            Vec::new()
        });

        Ok(VideoRecord {
            video_id: video.video_id,
            title: video.title,
            description: video.description,
            published_at: video.published_at,
            summarized_description: annotation.summary,
            sentiment: annotation.sentiment,
            comments,
        })
    }

    /// Up to `comment_limit` annotated top-level comments in platform order.
    ///
    /// # Arguments
    ///
    /// * `video_id` - Platform id of the video
    ///
    /// # Returns
    ///
    /// The annotated records, or exactly one [`CommentRecord::placeholder`]
    /// when the video has no comments. Annotation failures only drop that
    /// comment's summary or sentiment.
    #[instrument(level = "info", skip_all, fields(%video_id))]
    pub async fn fetch_comments(
        &self,
        video_id: &str,
    ) -> Result<Vec<CommentRecord>, PlatformError> {
        let comments = self
            .platform
            .comment_threads(video_id, self.comment_limit)
            .await?;

        if comments.is_empty() {
            info!("Video has no comments");
            return Ok(vec![CommentRecord::placeholder()]);
        }

        let annotator = &self.annotator;
        let limit = self.comment_limit as usize;
        let records: Vec<CommentRecord> = stream::iter(comments.into_iter().take(limit))
            .map(|comment| async move {
                let annotation = annotator.annotate(&comment.text).await;
                CommentRecord {
                    author: comment.author,
                    text: comment.text,
                    summarized_comment: annotation.summary,
                    sentiment: annotation.sentiment,
                }
            })
            .buffered(ANNOTATION_CONCURRENCY)
            .collect()
            .await;

        info!(count = records.len(), "Annotated comments");
        Ok(records)
    }

    /// Run the whole pipeline for one submitted URL.
    ///
    /// # Arguments
    ///
    /// * `url` - Channel, user, handle or video URL as typed by the user
    ///
    /// # Returns
    ///
    /// A [`ChannelReport`] for the resolved channel. Only resolution failure
    /// is an error. A failed profile or video fetch leaves that section `None`.
    #[instrument(level = "info", skip(self))]
    pub async fn report(&self, url: &str) -> Result<ChannelReport, ResolveError> {
        let channel_id = self.resolve(url).await?;

        let (profile, video) = tokio::join!(
            self.fetch_channel_profile(&channel_id),
            self.fetch_latest_video(&channel_id)
        );

        Ok(ChannelReport {
            profile: section_or_none("profile", &channel_id, profile),
            video: section_or_none("latest video", &channel_id, video),
            channel_id,
        })
    }
}

fn section_or_none<T>(
    section: &'static str,
    channel_id: &ChannelId,
    result: Result<T, LookupError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e @ LookupError::NotFound { .. }) => {
            info!(section, %channel_id, reason = %e, "Section omitted");
            None
        }
        Err(e) => {
            warn!(section, %channel_id, error = %e, "Section omitted after platform error");
            None
        }
    }
}
