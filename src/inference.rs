//! Hugging Face Inference API backends for [`Summarizer`] and
//! [`SentimentClassifier`].
//!
//! Both models are pinned at startup from [`InferenceSettings`] and never
//! reselected per call. A request is a single `POST {endpoint}/models/{model}`
//! with a JSON body of `inputs` and task `parameters`:
//!
//! ```text
//! summarization -> [{"summary_text": "..."}]
//! sentiment     -> [[{"label": "POSITIVE", "score": 0.99}, ...]]
//! ```
//!
//! There is no retry: a failed call is reported once and the annotation is
//! dropped by [`crate::annotate::Annotator`].

use crate::annotate::{SentimentClassifier, Summarizer};
use crate::config::{InferenceSettings, ModelSpec};
use crate::error::AnnotationError;
use crate::models::{SentimentLabel, SentimentResult};
use crate::utils::truncate_chars;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};
use url::Url;

/// Shared HTTP plumbing for one inference endpoint.
#[derive(Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
    max_input_chars: usize,
}

impl std::fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("authenticated", &self.token.is_some())
            .field("max_input_chars", &self.max_input_chars)
            .finish()
    }
}

impl InferenceClient {
    pub fn new(
        settings: &InferenceSettings,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AnnotationError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let endpoint = Url::parse(&settings.endpoint)?;
        Ok(Self {
            http,
            endpoint,
            token,
            max_input_chars: settings.max_input_chars,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            model
        )
    }

    /// POST one inference request and decode the response body.
    async fn infer<P, R>(
        &self,
        model: &str,
        text: &str,
        parameters: P,
    ) -> Result<R, AnnotationError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let request = InferenceRequest {
            inputs: truncate_chars(text, self.max_input_chars),
            parameters,
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let t0 = Instant::now();
        let mut builder = self.http.post(self.model_url(model)).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<BackendError>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
            };
            return Err(AnnotationError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<R>().await?;
        debug!(
            model,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Inference call finished"
        );
        Ok(body)
    }
}

/// Summaries via a seq2seq model such as `sshleifer/distilbart-cnn-12-6`.
#[derive(Debug, Clone)]
pub struct HuggingFaceSummarizer {
    client: InferenceClient,
    model: ModelSpec,
    min_length: u32,
    max_length: u32,
}

impl HuggingFaceSummarizer {
    pub fn new(client: InferenceClient, settings: &InferenceSettings) -> Self {
        info!(
            model = %settings.summarizer.model,
            revision = %settings.summarizer.revision,
            min_length = settings.summary_min_length,
            max_length = settings.summary_max_length,
            "Pinned summarization model"
        );
        Self {
            client,
            model: settings.summarizer.clone(),
            min_length: settings.summary_min_length,
            max_length: settings.summary_max_length,
        }
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    #[instrument(level = "debug", skip_all, fields(model = %self.model.model))]
    async fn summarize(&self, text: &str) -> Result<String, AnnotationError> {
        let parameters = SummaryParameters {
            min_length: self.min_length,
            max_length: self.max_length,
            do_sample: false,
        };
        let items: Vec<SummaryItem> = self
            .client
            .infer(&self.model.model, text, parameters)
            .await?;
        first_summary(items)
    }
}

/// Sentiment via a sequence classifier such as the SST-2 DistilBERT.
#[derive(Debug, Clone)]
pub struct HuggingFaceSentiment {
    client: InferenceClient,
    model: ModelSpec,
}

impl HuggingFaceSentiment {
    pub fn new(client: InferenceClient, settings: &InferenceSettings) -> Self {
        info!(
            model = %settings.sentiment.model,
            revision = %settings.sentiment.revision,
            "Pinned sentiment model"
        );
        Self {
            client,
            model: settings.sentiment.clone(),
        }
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceSentiment {
    #[instrument(level = "debug", skip_all, fields(model = %self.model.model))]
    async fn classify(&self, text: &str) -> Result<SentimentResult, AnnotationError> {
        let response: ClassificationResponse = self
            .client
            .infer(&self.model.model, text, serde_json::json!({}))
            .await?;
        top_label(response)
    }
}

// --- Wire types ---

#[derive(Debug, Serialize)]
struct InferenceRequest<'a, P> {
    inputs: &'a str,
    parameters: P,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Serialize)]
struct SummaryParameters {
    min_length: u32,
    max_length: u32,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
struct BackendError {
    error: String,
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

/// Text classification answers are nested one level per input; some
/// deployments flatten single inputs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

fn first_summary(items: Vec<SummaryItem>) -> Result<String, AnnotationError> {
    items
        .into_iter()
        .next()
        .map(|item| item.summary_text.trim().to_string())
        .filter(|summary| !summary.is_empty())
        .ok_or_else(|| {
            AnnotationError::UnexpectedResponse("no summary_text returned".to_string())
        })
}

fn top_label(response: ClassificationResponse) -> Result<SentimentResult, AnnotationError> {
    let scores = match response {
        ClassificationResponse::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
        ClassificationResponse::Flat(scores) => scores,
    };
    let best = scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| AnnotationError::UnexpectedResponse("no labels returned".to_string()))?;
    let label =
        SentimentLabel::parse(&best.label).ok_or(AnnotationError::UnknownLabel(best.label))?;
    Ok(SentimentResult {
        label,
        score: best.score.clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_local;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct Received {
        model: String,
        authorization: Option<String>,
        body: Value,
    }

    type Seen = Arc<Mutex<Vec<Received>>>;

    /// Canned inference backend keyed by model id.
    async fn infer_handler(
        State(seen): State<Seen>,
        Path(model): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        seen.lock().unwrap().push(Received {
            model: model.clone(),
            authorization,
            body,
        });

        match model.as_str() {
            "sshleifer/distilbart-cnn-12-6" => (
                StatusCode::OK,
                Json(json!([{"summary_text": "A short summary."}])),
            ),
            "distilbert-base-uncased-finetuned-sst-2-english" => (
                StatusCode::OK,
                Json(json!([[
                    {"label": "NEGATIVE", "score": 0.03},
                    {"label": "POSITIVE", "score": 0.97}
                ]])),
            ),
            _ => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"error": "Model is currently loading", "estimated_time": 20.0})),
            ),
        }
    }

    async fn local_settings() -> (InferenceSettings, Seen) {
        let seen = Seen::default();
        let router = Router::new()
            .route("/models/{*model}", post(infer_handler))
            .with_state(seen.clone());
        let settings = InferenceSettings {
            endpoint: serve_local(router).await,
            ..InferenceSettings::default()
        };
        (settings, seen)
    }

    fn client() -> InferenceClient {
        InferenceClient::new(
            &InferenceSettings::default(),
            Some("hf_token".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_model_url() {
        assert_eq!(
            client().model_url("sshleifer/distilbart-cnn-12-6"),
            "https://api-inference.huggingface.co/models/sshleifer/distilbart-cnn-12-6"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        assert!(!format!("{:?}", client()).contains("hf_token"));
    }

    #[test]
    fn test_invalid_endpoint() {
        let settings = InferenceSettings {
            endpoint: "::nope::".to_string(),
            ..InferenceSettings::default()
        };
        assert!(matches!(
            InferenceClient::new(&settings, None, Duration::from_secs(1)),
            Err(AnnotationError::Endpoint(_))
        ));
    }

    #[test]
    fn test_summary_request_body() {
        let request = InferenceRequest {
            inputs: "some text",
            parameters: SummaryParameters {
                min_length: 25,
                max_length: 50,
                do_sample: false,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["inputs"], "some text");
        assert_eq!(value["parameters"]["min_length"], 25);
        assert_eq!(value["parameters"]["max_length"], 50);
        assert_eq!(value["parameters"]["do_sample"], false);
    }

    #[test]
    fn test_first_summary() {
        let items: Vec<SummaryItem> =
            serde_json::from_str(r#"[{"summary_text": " A short summary. "}]"#).unwrap();
        assert_eq!(first_summary(items).unwrap(), "A short summary.");
        assert!(first_summary(Vec::new()).is_err());
    }

    #[test]
    fn test_top_label_nested() {
        let response: ClassificationResponse = serde_json::from_str(
            r#"[[{"label": "NEGATIVE", "score": 0.1}, {"label": "POSITIVE", "score": 0.9}]]"#,
        )
        .unwrap();
        let result = top_label(response).unwrap();
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!((result.score - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_top_label_flat() {
        let response: ClassificationResponse =
            serde_json::from_str(r#"[{"label": "NEGATIVE", "score": 0.97}]"#).unwrap();
        assert_eq!(top_label(response).unwrap().label, SentimentLabel::Negative);
    }

    #[test]
    fn test_top_label_rejects_unknown_and_empty() {
        let response: ClassificationResponse =
            serde_json::from_str(r#"[[{"label": "NEUTRAL", "score": 0.8}]]"#).unwrap();
        assert!(matches!(
            top_label(response),
            Err(AnnotationError::UnknownLabel(label)) if label == "NEUTRAL"
        ));

        let response: ClassificationResponse = serde_json::from_str("[[]]").unwrap();
        assert!(matches!(
            top_label(response),
            Err(AnnotationError::UnexpectedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_summarizer_sends_pinned_parameters() {
        let (settings, seen) = local_settings().await;
        let client =
            InferenceClient::new(&settings, Some("hf_token".to_string()), Duration::from_secs(5))
                .unwrap();
        let summarizer = HuggingFaceSummarizer::new(client, &settings);

        let summary = summarizer.summarize("A long description").await.unwrap();
        assert_eq!(summary, "A short summary.");

        let seen = seen.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.model, "sshleifer/distilbart-cnn-12-6");
        assert_eq!(request.authorization.as_deref(), Some("Bearer hf_token"));
        assert_eq!(request.body["inputs"], "A long description");
        assert_eq!(
            request.body["parameters"],
            json!({"min_length": 25, "max_length": 50, "do_sample": false})
        );
        assert_eq!(request.body["options"]["wait_for_model"], true);
    }

    #[tokio::test]
    async fn test_sentiment_without_token() {
        let (settings, seen) = local_settings().await;
        let client = InferenceClient::new(&settings, None, Duration::from_secs(5)).unwrap();
        let classifier = HuggingFaceSentiment::new(client, &settings);

        let result = classifier.classify("Loved it").await.unwrap();
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!((result.score - 0.97).abs() < 1e-6);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].model, "distilbert-base-uncased-finetuned-sst-2-english");
        assert_eq!(seen[0].authorization, None);
        assert_eq!(seen[0].body["parameters"], json!({}));
    }

    #[tokio::test]
    async fn test_long_input_is_truncated() {
        let (mut settings, seen) = local_settings().await;
        settings.max_input_chars = 10;
        let client = InferenceClient::new(&settings, None, Duration::from_secs(5)).unwrap();
        let classifier = HuggingFaceSentiment::new(client, &settings);

        classifier.classify("0123456789 and more").await.unwrap();
        assert_eq!(seen.lock().unwrap()[0].body["inputs"], "0123456789");
    }

    #[tokio::test]
    async fn test_backend_failure_maps_to_backend_error() {
        let (mut settings, _) = local_settings().await;
        settings.summarizer.model = "broken/model".to_string();
        let client = InferenceClient::new(&settings, None, Duration::from_secs(5)).unwrap();
        let summarizer = HuggingFaceSummarizer::new(client, &settings);

        match summarizer.summarize("Some text").await {
            Err(AnnotationError::Backend { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "Model is currently loading");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_backend_error_body() {
        let body: BackendError = serde_json::from_str(
            r#"{"error": "Model is currently loading", "estimated_time": 20.0}"#,
        )
        .unwrap();
        assert_eq!(body.error, "Model is currently loading");
    }
}
