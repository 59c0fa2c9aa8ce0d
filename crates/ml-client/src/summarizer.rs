use analysis_core::{Capability, CapabilityError, Summarizer};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::error::{MLError, MLResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary_text: String,
}

#[derive(Debug, Clone, Serialize)]
struct SummaryRequest<'a> {
    text: &'a str,
    min_length: usize,
    max_length: usize,
    do_sample: bool,
}

/// Client for the abstractive summarization service (BART-CNN style)
#[derive(Clone)]
pub struct SummarizerClient {
    client: reqwest::Client,
    base_url: String,
}

impl SummarizerClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: crate::build_http_client(timeout),
            base_url,
        }
    }

    pub async fn summarize_text(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> MLResult<String> {
        let request = SummaryRequest {
            text,
            min_length,
            max_length,
            do_sample: false,
        };

        let result: SummaryResponse =
            crate::post_json(&self.client, &format!("{}/summarize", self.base_url), &request)
                .await?;

        let summary = result.summary_text.trim();
        if summary.is_empty() {
            return Err(MLError::InvalidResponse("empty summary".to_string()));
        }
        Ok(summary.to_string())
    }

    pub async fn health(&self) -> MLResult<()> {
        crate::check_health(&self.client, &self.base_url).await
    }
}

#[async_trait]
impl Capability for SummarizerClient {
    fn name(&self) -> &'static str {
        "summarizer"
    }

    async fn warm_up(&self) -> Result<(), CapabilityError> {
        Ok(self.health().await?)
    }
}

#[async_trait]
impl Summarizer for SummarizerClient {
    async fn summarize(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, CapabilityError> {
        Ok(self.summarize_text(text, min_length, max_length).await?)
    }
}
