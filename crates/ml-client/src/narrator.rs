use analysis_core::{Capability, CapabilityError, Narrator, SpokenTranslation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::error::{MLError, MLResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationResponse {
    pub translated_text: String,
    /// Path or URL of the synthesized audio, as reported by the service
    pub audio_file: String,
}

#[derive(Debug, Clone, Serialize)]
struct NarrationRequest<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
}

/// Client for the translation + text-to-speech service
#[derive(Clone)]
pub struct NarratorClient {
    client: reqwest::Client,
    base_url: String,
    target_language: String,
}

impl NarratorClient {
    pub fn new(base_url: String, target_language: String, timeout: Duration) -> Self {
        Self {
            client: crate::build_http_client(timeout),
            base_url,
            target_language,
        }
    }

    pub async fn narrate(&self, text: &str) -> MLResult<NarrationResponse> {
        let request = NarrationRequest {
            text,
            source_lang: "en",
            target_lang: &self.target_language,
        };

        let result: NarrationResponse = crate::post_json(
            &self.client,
            &format!("{}/translate-speak", self.base_url),
            &request,
        )
        .await?;

        if result.audio_file.trim().is_empty() {
            return Err(MLError::InvalidResponse("no audio file produced".to_string()));
        }

        tracing::info!(
            "Translated verdict into '{}', audio saved as {}",
            self.target_language,
            result.audio_file
        );
        Ok(result)
    }

    pub async fn health(&self) -> MLResult<()> {
        crate::check_health(&self.client, &self.base_url).await
    }
}

#[async_trait]
impl Capability for NarratorClient {
    fn name(&self) -> &'static str {
        "narrator"
    }

    async fn warm_up(&self) -> Result<(), CapabilityError> {
        Ok(self.health().await?)
    }
}

#[async_trait]
impl Narrator for NarratorClient {
    async fn translate_and_speak(&self, text: &str) -> Result<SpokenTranslation, CapabilityError> {
        let response = self.narrate(text).await?;
        Ok(SpokenTranslation {
            translated_text: response.translated_text,
            audio_file: response.audio_file,
        })
    }
}
