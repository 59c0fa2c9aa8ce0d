pub mod error;
pub mod narrator;
pub mod sentiment;
pub mod summarizer;
pub mod topics;

pub use error::{MLError, MLResult};
pub use narrator::NarratorClient;
pub use sentiment::SentimentClient;
pub use summarizer::SummarizerClient;
pub use topics::TopicClient;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Configuration for ML services
#[derive(Debug, Clone)]
pub struct MLConfig {
    pub summarizer_url: String,
    pub sentiment_url: String,
    pub topics_url: String,
    pub narrator_url: String,
    /// Language the final verdict is translated into before speech synthesis
    pub narrator_language: String,
    pub timeout: Duration,
}

impl Default for MLConfig {
    fn default() -> Self {
        Self {
            summarizer_url: std::env::var("ML_SUMMARIZER_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            sentiment_url: std::env::var("ML_SENTIMENT_URL")
                .unwrap_or_else(|_| "http://localhost:8002".to_string()),
            topics_url: std::env::var("ML_TOPICS_URL")
                .unwrap_or_else(|_| "http://localhost:8003".to_string()),
            narrator_url: std::env::var("ML_NARRATOR_URL")
                .unwrap_or_else(|_| "http://localhost:8004".to_string()),
            narrator_language: std::env::var("ML_NARRATOR_LANGUAGE")
                .unwrap_or_else(|_| "hi".to_string()),
            // Summarization on CPU is slow; give inference plenty of room
            timeout: std::env::var("ML_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(120)),
        }
    }
}

/// Complete ML client with all services
#[derive(Clone)]
pub struct MLClient {
    pub summarizer: SummarizerClient,
    pub sentiment: SentimentClient,
    pub topics: TopicClient,
    pub narrator: NarratorClient,
}

impl MLClient {
    pub fn new(config: MLConfig) -> Self {
        Self {
            summarizer: SummarizerClient::new(config.summarizer_url.clone(), config.timeout),
            sentiment: SentimentClient::new(config.sentiment_url.clone(), config.timeout),
            topics: TopicClient::new(config.topics_url.clone(), config.timeout),
            narrator: NarratorClient::new(
                config.narrator_url.clone(),
                config.narrator_language.clone(),
                config.timeout,
            ),
        }
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// POST a JSON body and decode the JSON reply, mapping non-2xx to `ServiceUnavailable`.
pub(crate) async fn post_json<Req, Resp>(
    client: &reqwest::Client,
    url: &str,
    body: &Req,
) -> MLResult<Resp>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let response = client.post(url).json(body).send().await?;

    if !response.status().is_success() {
        return Err(MLError::ServiceUnavailable(format!(
            "Status: {}",
            response.status()
        )));
    }

    Ok(response.json::<Resp>().await?)
}

pub(crate) async fn check_health(client: &reqwest::Client, base_url: &str) -> MLResult<()> {
    let response = client.get(format!("{}/health", base_url)).send().await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(MLError::ServiceUnavailable(format!(
            "{} health check returned {}",
            base_url,
            response.status()
        )))
    }
}
