//! Text annotation: a short summary and a sentiment label for any text unit.
//!
//! The two model backends sit behind [`Summarizer`] and
//! [`SentimentClassifier`]. [`Annotator`] is the boundary the pipeline talks
//! to: it never fails, it turns every backend error into a missing field and
//! logs the cause.

use crate::error::AnnotationError;
use crate::models::SentimentResult;
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Abstractive summarization with deterministic decoding.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, AnnotationError>;
}

/// Single-label sentiment classification.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SentimentResult, AnnotationError>;
}

/// Summary and sentiment for one text unit. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    pub summary: Option<String>,
    pub sentiment: Option<SentimentResult>,
}

/// Shared handle to both model backends, loaded once at startup.
#[derive(Clone)]
pub struct Annotator {
    summarizer: Arc<dyn Summarizer>,
    classifier: Arc<dyn SentimentClassifier>,
}

impl Annotator {
    pub fn new(summarizer: Arc<dyn Summarizer>, classifier: Arc<dyn SentimentClassifier>) -> Self {
        Self {
            summarizer,
            classifier,
        }
    }

    /// Summarize `text`, or `None` when the backend cannot.
    #[instrument(level = "debug", skip_all, fields(chars = text.chars().count()))]
    pub async fn summarize(&self, text: &str) -> Option<String> {
        let result = match non_blank(text) {
            Ok(text) => self.summarizer.summarize(text).await,
            Err(e) => Err(e),
        };
        unavailable_as_none("summarization", text, result)
    }

    /// Classify `text`, or `None` when the backend cannot.
    #[instrument(level = "debug", skip_all, fields(chars = text.chars().count()))]
    pub async fn classify_sentiment(&self, text: &str) -> Option<SentimentResult> {
        let result = match non_blank(text) {
            Ok(text) => self.classifier.classify(text).await,
            Err(e) => Err(e),
        };
        unavailable_as_none("sentiment", text, result)
    }

    /// Run both annotations on the same text concurrently.
    pub async fn annotate(&self, text: &str) -> Annotation {
        let (summary, sentiment) =
            tokio::join!(self.summarize(text), self.classify_sentiment(text));
        Annotation { summary, sentiment }
    }
}

fn non_blank(text: &str) -> Result<&str, AnnotationError> {
    if text.trim().is_empty() {
        Err(AnnotationError::EmptyInput)
    } else {
        Ok(text)
    }
}

fn unavailable_as_none<T>(
    task: &'static str,
    text: &str,
    result: Result<T, AnnotationError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(AnnotationError::EmptyInput) => {
            debug!(task, "Skipping annotation of empty text");
            None
        }
        Err(e) => {
            warn!(
                task,
                error = %e,
                input_preview = %truncate_for_log(text, 80),
                "Annotation unavailable"
            );
            None
        }
    }
}
