use async_trait::async_trait;
use crate::{CapabilityError, FetchedPage, LabelScore, SpokenTranslation};

/// Lifecycle shared by every injected capability.
///
/// Model-backed capabilities are expensive to bring up, so callers warm them
/// once before serving requests and shut them down explicitly on exit.
#[async_trait]
pub trait Capability: Send + Sync {
    fn name(&self) -> &'static str;

    /// Readiness probe / model warm-up
    async fn warm_up(&self) -> Result<(), CapabilityError> {
        Ok(())
    }

    async fn shutdown(&self) {}
}

/// Retrieves the headline and body text of one article
#[async_trait]
pub trait ArticleFetcher: Capability {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, CapabilityError>;
}

/// Abstractive summarization
#[async_trait]
pub trait Summarizer: Capability {
    async fn summarize(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, CapabilityError>;
}

/// Sentiment classification; one score list per input chunk
#[async_trait]
pub trait SentimentClassifier: Capability {
    async fn classify_sentiment(
        &self,
        chunks: &[String],
    ) -> Result<Vec<Vec<LabelScore>>, CapabilityError>;
}

/// Multi-label zero-shot topic classification
#[async_trait]
pub trait TopicClassifier: Capability {
    async fn classify_topics(
        &self,
        text: &str,
        labels: &[&str],
    ) -> Result<Vec<LabelScore>, CapabilityError>;
}

/// Translates the final verdict and synthesizes speech for it
#[async_trait]
pub trait Narrator: Capability {
    async fn translate_and_speak(&self, text: &str) -> Result<SpokenTranslation, CapabilityError>;
}
