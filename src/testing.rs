//! In-memory stand-ins for the platform and both models, shared by unit tests.

use crate::annotate::{SentimentClassifier, Summarizer};
use crate::error::{AnnotationError, PlatformError};
use crate::models::{ChannelId, ChannelProfile, SentimentLabel, SentimentResult};
use crate::youtube::{PlatformComment, PlatformVideo, VideoPlatform};
use async_trait::async_trait;
use axum::Router;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve_local(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A local address with nothing listening on it.
pub async fn closed_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn sample_profile() -> ChannelProfile {
    ChannelProfile {
        title: "Rust Talks".to_string(),
        description: "Conference talks about Rust".to_string(),
        subscriber_count: Some(12_345),
        view_count: Some(987_654),
    }
}

/// Platform backed by hash maps. Clones share the call counter.
#[derive(Clone, Default)]
pub struct FakePlatform {
    video_owners: HashMap<String, String>,
    usernames: HashMap<String, String>,
    search_hits: HashMap<String, String>,
    profiles: HashMap<String, ChannelProfile>,
    latest: HashMap<String, PlatformVideo>,
    comments: HashMap<String, Vec<PlatformComment>>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl FakePlatform {
    pub fn with_video_owner(mut self, video_id: &str, channel_id: &str) -> Self {
        self.video_owners
            .insert(video_id.to_string(), channel_id.to_string());
        self
    }

    pub fn with_username(mut self, username: &str, channel_id: &str) -> Self {
        self.usernames
            .insert(username.to_string(), channel_id.to_string());
        self
    }

    pub fn with_search_hit(mut self, query: &str, channel_id: &str) -> Self {
        self.search_hits
            .insert(query.to_string(), channel_id.to_string());
        self
    }

    pub fn with_profile(mut self, channel_id: &str, profile: ChannelProfile) -> Self {
        self.profiles.insert(channel_id.to_string(), profile);
        self
    }

    pub fn with_latest_video(
        mut self,
        channel_id: &str,
        video_id: &str,
        description: &str,
    ) -> Self {
        self.latest.insert(
            channel_id.to_string(),
            PlatformVideo {
                video_id: video_id.to_string(),
                title: format!("Video {video_id}"),
                description: description.to_string(),
                published_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            },
        );
        self
    }

    /// Comments authored by `viewer1`, `viewer2`, ... in the given order.
    pub fn with_comments(mut self, video_id: &str, texts: &[String]) -> Self {
        let comments = texts
            .iter()
            .enumerate()
            .map(|(i, text)| PlatformComment {
                author: format!("viewer{}", i + 1),
                text: text.clone(),
            })
            .collect();
        self.comments.insert(video_id.to_string(), comments);
        self
    }

    /// Every query fails with an API error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) -> Result<(), PlatformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PlatformError::Api {
                status: 500,
                message: "backend error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VideoPlatform for FakePlatform {
    async fn video_channel_id(&self, video_id: &str) -> Result<Option<ChannelId>, PlatformError> {
        self.record()?;
        Ok(self.video_owners.get(video_id).map(ChannelId::new))
    }

    async fn channel_id_for_username(
        &self,
        username: &str,
    ) -> Result<Option<ChannelId>, PlatformError> {
        self.record()?;
        Ok(self.usernames.get(username).map(ChannelId::new))
    }

    async fn search_channel(&self, query: &str) -> Result<Option<ChannelId>, PlatformError> {
        self.record()?;
        Ok(self.search_hits.get(query).map(ChannelId::new))
    }

    async fn channel_profile(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Option<ChannelProfile>, PlatformError> {
        self.record()?;
        Ok(self.profiles.get(channel_id.as_str()).cloned())
    }

    async fn latest_video(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Option<PlatformVideo>, PlatformError> {
        self.record()?;
        Ok(self.latest.get(channel_id.as_str()).cloned())
    }

    async fn comment_threads(
        &self,
        video_id: &str,
        _max_results: u32,
    ) -> Result<Vec<PlatformComment>, PlatformError> {
        self.record()?;
        // Returns every stored comment regardless of max_results.
        Ok(self.comments.get(video_id).cloned().unwrap_or_default())
    }
}

/// Echoing summarizer that fails when the input contains a trigger word.
#[derive(Default)]
pub struct FakeSummarizer {
    fail_on: Option<String>,
    calls: AtomicUsize,
}

impl FakeSummarizer {
    pub fn failing_on(trigger: &str) -> Self {
        Self {
            fail_on: Some(trigger.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, AnnotationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.as_deref().is_some_and(|t| text.contains(t)) {
            return Err(AnnotationError::Backend {
                status: 503,
                message: "model unavailable".to_string(),
            });
        }
        Ok(format!("summary of: {text}"))
    }
}

/// Keyword classifier: "terrible", "bad" and "hate" are negative.
#[derive(Default)]
pub struct FakeClassifier {
    fail_on: Option<String>,
    calls: AtomicUsize,
}

impl FakeClassifier {
    pub fn failing_on(trigger: &str) -> Self {
        Self {
            fail_on: Some(trigger.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentClassifier for FakeClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentResult, AnnotationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.as_deref().is_some_and(|t| text.contains(t)) {
            return Err(AnnotationError::UnexpectedResponse(
                "no labels returned".to_string(),
            ));
        }
        let lowered = text.to_lowercase();
        let negative = ["terrible", "bad", "hate"]
            .iter()
            .any(|word| lowered.contains(word));
        Ok(SentimentResult {
            label: if negative {
                SentimentLabel::Negative
            } else {
                SentimentLabel::Positive
            },
            score: 0.98,
        })
    }
}
