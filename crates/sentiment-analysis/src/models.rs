use analysis_core::{CapabilityError, SentimentClassifier, Summarizer, TopicClassifier};
use ml_client::MLClient;
use std::future::Future;
use std::sync::Arc;

/// The model capabilities used for per-article extraction.
///
/// Built once at startup and shared by every analysis task. `initialize`
/// probes each capability before traffic is accepted; `shutdown` releases
/// them when the process stops.
#[derive(Clone)]
pub struct ExtractionModels {
    pub summarizer: Arc<dyn Summarizer>,
    pub sentiment: Arc<dyn SentimentClassifier>,
    pub topics: Arc<dyn TopicClassifier>,
}

impl ExtractionModels {
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        sentiment: Arc<dyn SentimentClassifier>,
        topics: Arc<dyn TopicClassifier>,
    ) -> Self {
        Self {
            summarizer,
            sentiment,
            topics,
        }
    }

    /// HTTP-backed models from an `MLClient`
    pub fn from_ml_client(client: &MLClient) -> Self {
        Self::new(
            Arc::new(client.summarizer.clone()),
            Arc::new(client.sentiment.clone()),
            Arc::new(client.topics.clone()),
        )
    }

    /// Warm up every model, failing on the first one that is not ready.
    pub async fn initialize(&self) -> Result<(), CapabilityError> {
        warm_up(self.summarizer.name(), self.summarizer.warm_up()).await?;
        warm_up(self.sentiment.name(), self.sentiment.warm_up()).await?;
        warm_up(self.topics.name(), self.topics.warm_up()).await?;
        tracing::info!("All extraction models ready");
        Ok(())
    }

    pub async fn shutdown(&self) {
        self.summarizer.shutdown().await;
        self.sentiment.shutdown().await;
        self.topics.shutdown().await;
        tracing::info!("Extraction models shut down");
    }
}

async fn warm_up<F>(name: &str, probe: F) -> Result<(), CapabilityError>
where
    F: Future<Output = Result<(), CapabilityError>>,
{
    tracing::info!("Warming up {} model", name);
    probe.await.map_err(|e| {
        tracing::error!("{} model failed to initialize: {}", name, e);
        e
    })
}
