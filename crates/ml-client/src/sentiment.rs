use analysis_core::{Capability, CapabilityError, LabelScore, SentimentClassifier};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::error::{MLError, MLResult};

const BATCH_SIZE: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResponse {
    /// One list of label scores per input text
    pub predictions: Vec<Vec<LabelScore>>,
    #[serde(default)]
    pub processing_time_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
struct SentimentRequest<'a> {
    texts: &'a [String],
    batch_size: usize,
}

/// Client for the FinBERT-style sentiment service
#[derive(Clone)]
pub struct SentimentClient {
    client: reqwest::Client,
    base_url: String,
}

impl SentimentClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: crate::build_http_client(timeout),
            base_url,
        }
    }

    /// Predict sentiment for each text
    pub async fn predict(&self, texts: &[String]) -> MLResult<SentimentResponse> {
        let request = SentimentRequest {
            texts,
            batch_size: BATCH_SIZE,
        };

        let result: SentimentResponse =
            crate::post_json(&self.client, &format!("{}/predict", self.base_url), &request).await?;

        if result.predictions.len() != texts.len() {
            return Err(MLError::InvalidResponse(format!(
                "expected {} predictions, got {}",
                texts.len(),
                result.predictions.len()
            )));
        }

        tracing::debug!(
            "Sentiment service scored {} chunks in {:.0}ms",
            texts.len(),
            result.processing_time_ms
        );
        Ok(result)
    }

    /// Check service health
    pub async fn health(&self) -> MLResult<()> {
        crate::check_health(&self.client, &self.base_url).await
    }
}

#[async_trait]
impl Capability for SentimentClient {
    fn name(&self) -> &'static str {
        "sentiment"
    }

    async fn warm_up(&self) -> Result<(), CapabilityError> {
        Ok(self.health().await?)
    }
}

#[async_trait]
impl SentimentClassifier for SentimentClient {
    async fn classify_sentiment(
        &self,
        chunks: &[String],
    ) -> Result<Vec<Vec<LabelScore>>, CapabilityError> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.predict(chunks).await?.predictions)
    }
}
