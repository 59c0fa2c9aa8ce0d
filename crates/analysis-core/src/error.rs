use thiserror::Error;

/// Failure of an external capability (model service, fetcher, narrator)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapabilityError {
    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request failed: {0}")]
    Request(String),
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Unknown company: {0}")]
    UnknownCompany(String),

    #[error("Failed to fetch article {article_id}: {reason}")]
    FetchFailure { article_id: String, reason: String },

    #[error("Extraction failed for article {article_id}: {source}")]
    ExtractionFailure {
        article_id: String,
        #[source]
        source: CapabilityError,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Translate-and-speak failed: {0}")]
    NarrationFailure(#[source] CapabilityError),

    #[error("Task error: {0}")]
    TaskFailure(String),
}

impl AnalysisError {
    pub fn extraction(article_id: impl Into<String>, source: CapabilityError) -> Self {
        AnalysisError::ExtractionFailure {
            article_id: article_id.into(),
            source,
        }
    }

    /// Article identifier attached to per-article failures
    pub fn article_id(&self) -> Option<&str> {
        match self {
            AnalysisError::FetchFailure { article_id, .. }
            | AnalysisError::ExtractionFailure { article_id, .. } => Some(article_id),
            _ => None,
        }
    }
}
