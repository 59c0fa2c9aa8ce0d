use analysis_core::{Capability, CapabilityError, LabelScore, TopicClassifier};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::error::{MLError, MLResult};

/// Zero-shot classification output: parallel label / score arrays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroShotResponse {
    #[serde(default)]
    pub sequence: Option<String>,
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ZeroShotResponse {
    pub fn into_label_scores(self) -> MLResult<Vec<LabelScore>> {
        if self.labels.len() != self.scores.len() {
            return Err(MLError::InvalidResponse(format!(
                "{} labels but {} scores",
                self.labels.len(),
                self.scores.len()
            )));
        }
        Ok(self
            .labels
            .into_iter()
            .zip(self.scores)
            .map(|(label, score)| LabelScore { label, score })
            .collect())
    }
}

#[derive(Debug, Clone, Serialize)]
struct ZeroShotRequest<'a> {
    sequence: &'a str,
    candidate_labels: &'a [&'a str],
    multi_label: bool,
}

/// Client for the zero-shot topic classification service (BART-MNLI style)
#[derive(Clone)]
pub struct TopicClient {
    client: reqwest::Client,
    base_url: String,
}

impl TopicClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: crate::build_http_client(timeout),
            base_url,
        }
    }

    /// Score every candidate label independently against `text`
    pub async fn classify(&self, text: &str, labels: &[&str]) -> MLResult<ZeroShotResponse> {
        let request = ZeroShotRequest {
            sequence: text,
            candidate_labels: labels,
            multi_label: true,
        };

        crate::post_json(&self.client, &format!("{}/classify", self.base_url), &request).await
    }

    pub async fn health(&self) -> MLResult<()> {
        crate::check_health(&self.client, &self.base_url).await
    }
}

#[async_trait]
impl Capability for TopicClient {
    fn name(&self) -> &'static str {
        "topics"
    }

    async fn warm_up(&self) -> Result<(), CapabilityError> {
        Ok(self.health().await?)
    }
}

#[async_trait]
impl TopicClassifier for TopicClient {
    async fn classify_topics(
        &self,
        text: &str,
        labels: &[&str],
    ) -> Result<Vec<LabelScore>, CapabilityError> {
        Ok(self.classify(text, labels).await?.into_label_scores()?)
    }
}
