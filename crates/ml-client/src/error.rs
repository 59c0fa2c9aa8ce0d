use analysis_core::CapabilityError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MLError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type MLResult<T> = Result<T, MLError>;

impl From<MLError> for CapabilityError {
    fn from(err: MLError) -> Self {
        match err {
            MLError::RequestFailed(e) if e.is_decode() => {
                CapabilityError::MalformedResponse(e.to_string())
            }
            MLError::RequestFailed(e) if e.is_timeout() || e.is_connect() => {
                CapabilityError::Unavailable(e.to_string())
            }
            MLError::RequestFailed(e) => CapabilityError::Request(e.to_string()),
            MLError::ServiceUnavailable(msg) => CapabilityError::Unavailable(msg),
            MLError::InvalidResponse(msg) => CapabilityError::MalformedResponse(msg),
        }
    }
}
