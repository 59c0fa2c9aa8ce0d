use analysis_orchestrator::{FailurePolicy, PipelineConfig};
use anyhow::{bail, Context, Result};
use ml_client::MLConfig;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Per-request timeout for article page downloads
    pub fetch_timeout: Duration,
    pub ml: MLConfig,
    pub pipeline: PipelineConfig,
}

/// Read `key`, falling back to `default`, and parse it.
fn var_or<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("invalid {}: '{}'", key, raw))
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        // URLs and narrator language come from MLConfig's own env lookup
        let ml = MLConfig {
            timeout: Duration::from_secs(var_or("ML_TIMEOUT_SECS", "120")?),
            ..MLConfig::default()
        };

        let mut pipeline = PipelineConfig {
            url_template: env::var("ARTICLE_URL_TEMPLATE")
                .unwrap_or_else(|_| PipelineConfig::default().url_template),
            fetch_concurrency: var_or("FETCH_CONCURRENCY", "5")?,
            analysis_concurrency: var_or("ANALYSIS_CONCURRENCY", "4")?,
            failure_policy: var_or::<FailurePolicy>("FAILURE_POLICY", "abort")?,
            narrative_seed: match env::var("NARRATIVE_SEED") {
                Ok(raw) if !raw.trim().is_empty() => Some(
                    raw.trim()
                        .parse()
                        .with_context(|| format!("invalid NARRATIVE_SEED: '{}'", raw))?,
                ),
                _ => None,
            },
            ..PipelineConfig::default()
        };
        pipeline.article.max_input_chars = var_or("MAX_INPUT_CHARS", "3200")?;
        pipeline.article.chunk_chars = var_or("CHUNK_CHARS", "1024")?;
        pipeline.article.summary_min_length = var_or("SUMMARY_MIN_LENGTH", "100")?;
        pipeline.article.summary_max_length = var_or("SUMMARY_MAX_LENGTH", "200")?;

        let config = Self {
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:8000")?,
            fetch_timeout: Duration::from_secs(var_or("FETCH_TIMEOUT_SECS", "30")?),
            ml,
            pipeline,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let pipeline = &self.pipeline;
        let article = &pipeline.article;

        if pipeline.fetch_concurrency == 0 {
            bail!("FETCH_CONCURRENCY must be at least 1");
        }
        if pipeline.analysis_concurrency == 0 {
            bail!("ANALYSIS_CONCURRENCY must be at least 1");
        }
        if !pipeline.url_template.contains("{id}") {
            bail!("ARTICLE_URL_TEMPLATE must contain an {{id}} placeholder");
        }
        if article.max_input_chars == 0 || article.chunk_chars == 0 {
            bail!("MAX_INPUT_CHARS and CHUNK_CHARS must be positive");
        }
        if article.summary_min_length > article.summary_max_length {
            bail!(
                "SUMMARY_MIN_LENGTH ({}) exceeds SUMMARY_MAX_LENGTH ({})",
                article.summary_min_length,
                article.summary_max_length
            );
        }
        if self.ml.timeout.is_zero() || self.fetch_timeout.is_zero() {
            bail!("ML_TIMEOUT_SECS and FETCH_TIMEOUT_SECS must be positive");
        }

        for (key, url) in [
            ("ML_SUMMARIZER_URL", &self.ml.summarizer_url),
            ("ML_SENTIMENT_URL", &self.ml.sentiment_url),
            ("ML_TOPICS_URL", &self.ml.topics_url),
            ("ML_NARRATOR_URL", &self.ml.narrator_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("{} must be an http(s) URL, got '{}'", key, url);
            }
        }

        Ok(())
    }
}
