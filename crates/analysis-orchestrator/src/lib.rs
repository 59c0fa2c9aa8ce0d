use analysis_core::{
    AnalysisError, ArticleFetcher, ArticleResult, CapabilityError, CompanyAnalysis, FetchedArticle,
    Narrator,
};
use article_fetcher::{article_url, HtmlArticleFetcher, DEFAULT_URL_TEMPLATE};
use chrono::Utc;
use ml_client::{MLClient, MLConfig};
use sentiment_analysis::{ArticleAnalyzer, ComparativeAnalyzer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

pub mod registry;
pub use registry::{CompanyArticles, CompanyRegistry};
pub use sentiment_analysis::{ArticleAnalyzerConfig, ExtractionModels};

#[cfg(test)]
mod tests;

/// What a failed article analysis does to the rest of the batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Let siblings finish, discard everything and report the first failure
    #[default]
    AbortBatch,
    /// Log the failure and continue without that article
    SkipArticle,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" | "abort_batch" => Ok(FailurePolicy::AbortBatch),
            "skip" | "skip_article" => Ok(FailurePolicy::SkipArticle),
            other => Err(format!("unknown failure policy '{}' (expected abort or skip)", other)),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::AbortBatch => f.write_str("abort"),
            FailurePolicy::SkipArticle => f.write_str("skip"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Article URL template; `{id}` is replaced by the article identifier
    pub url_template: String,
    pub fetch_concurrency: usize,
    pub analysis_concurrency: usize,
    pub failure_policy: FailurePolicy,
    pub article: ArticleAnalyzerConfig,
    /// Fixed seed for the thematic narrative wording
    pub narrative_seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            fetch_concurrency: 5,
            analysis_concurrency: 4,
            failure_policy: FailurePolicy::default(),
            article: ArticleAnalyzerConfig::default(),
            narrative_seed: None,
        }
    }
}

/// Drives one company analysis from article lookup to spoken verdict.
///
/// Every article gets its own task: it fetches under the fetch pool, then
/// analyzes under the analysis pool, so fetching later articles overlaps
/// the analysis of earlier ones. Results are joined by article index.
///
/// Under `FailurePolicy::AbortBatch` the first failed analysis stops every
/// task that has not yet been granted a permit; tasks already fetching or
/// analyzing run to completion and their results are discarded.
pub struct PipelineOrchestrator {
    registry: Arc<CompanyRegistry>,
    fetcher: Arc<dyn ArticleFetcher>,
    analyzer: Arc<ArticleAnalyzer>,
    comparative: ComparativeAnalyzer,
    narrator: Arc<dyn Narrator>,
    config: PipelineConfig,
}

impl PipelineOrchestrator {
    pub fn new(
        registry: CompanyRegistry,
        fetcher: Arc<dyn ArticleFetcher>,
        models: ExtractionModels,
        narrator: Arc<dyn Narrator>,
        config: PipelineConfig,
    ) -> Self {
        let analyzer = ArticleAnalyzer::new(models, config.article.clone());
        let comparative = match config.narrative_seed {
            Some(seed) => ComparativeAnalyzer::with_seed(seed),
            None => ComparativeAnalyzer::new(),
        };

        Self {
            registry: Arc::new(registry),
            fetcher,
            analyzer: Arc::new(analyzer),
            comparative,
            narrator,
            config,
        }
    }

    /// Built-in companies, HTML fetching and HTTP model services
    pub fn from_ml_config(ml_config: MLConfig, fetch_timeout: Duration, config: PipelineConfig) -> Self {
        let client = MLClient::new(ml_config);
        Self::new(
            CompanyRegistry::builtin(),
            Arc::new(HtmlArticleFetcher::new(fetch_timeout)),
            ExtractionModels::from_ml_client(&client),
            Arc::new(client.narrator.clone()),
            config,
        )
    }

    pub fn registry(&self) -> &CompanyRegistry {
        &self.registry
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Probe every capability once before serving requests.
    pub async fn initialize(&self) -> Result<(), CapabilityError> {
        tracing::info!("Initializing {} capability", self.fetcher.name());
        self.fetcher.warm_up().await?;
        self.analyzer.models().initialize().await?;
        tracing::info!("Initializing {} capability", self.narrator.name());
        self.narrator.warm_up().await?;
        Ok(())
    }

    pub async fn shutdown(&self) {
        self.fetcher.shutdown().await;
        self.analyzer.models().shutdown().await;
        self.narrator.shutdown().await;
        tracing::info!("Pipeline capabilities released");
    }

    pub async fn run_analysis(&self, company: &str) -> Result<CompanyAnalysis, AnalysisError> {
        let article_ids = self
            .registry
            .lookup(company)
            .ok_or_else(|| AnalysisError::UnknownCompany(company.to_string()))?;

        tracing::info!(
            "Starting analysis for {} ({} articles, fetch width {}, analysis width {})",
            company,
            article_ids.len(),
            self.config.fetch_concurrency,
            self.config.analysis_concurrency
        );

        let articles = self.analyze_articles(article_ids).await?;
        let report = self.comparative.compare(company, &articles).await?;

        let spoken = self
            .narrator
            .translate_and_speak(&report.final_verdict)
            .await
            .map_err(|e| {
                tracing::error!("Translate-and-speak failed for {}: {}", company, e);
                AnalysisError::NarrationFailure(e)
            })?;

        tracing::info!("Analysis complete for {}: {}", company, report.final_verdict);

        Ok(CompanyAnalysis {
            company: company.to_string(),
            timestamp: Utc::now(),
            articles,
            report,
            translated_text: spoken.translated_text,
            audio_file: spoken.audio_file,
        })
    }

    /// Fetch and analyze every article, returning results in identifier order.
    async fn analyze_articles(&self, article_ids: &[String]) -> Result<Vec<ArticleResult>, AnalysisError> {
        let fetch_pool = Arc::new(Semaphore::new(self.config.fetch_concurrency.max(1)));
        let analysis_pool = Arc::new(Semaphore::new(self.config.analysis_concurrency.max(1)));
        let aborted = Arc::new(AtomicBool::new(false));
        let abort_on_failure = self.config.failure_policy == FailurePolicy::AbortBatch;
        let mut handles = Vec::with_capacity(article_ids.len());

        for article_id in article_ids {
            let article_id = article_id.clone();
            let url = article_url(&self.config.url_template, &article_id);
            let fetcher = Arc::clone(&self.fetcher);
            let analyzer = Arc::clone(&self.analyzer);
            let fetch_pool = Arc::clone(&fetch_pool);
            let analysis_pool = Arc::clone(&analysis_pool);
            let aborted = Arc::clone(&aborted);

            handles.push(tokio::spawn(async move {
                let fetched = {
                    let _permit = fetch_pool
                        .acquire_owned()
                        .await
                        .map_err(|e| AnalysisError::TaskFailure(e.to_string()))?;
                    if aborted.load(Ordering::SeqCst) {
                        tracing::debug!("Batch aborted; not fetching article {}", article_id);
                        return Ok(None);
                    }
                    fetch_article(fetcher.as_ref(), &article_id, url).await
                };

                let article = match fetched {
                    Ok(article) => article,
                    Err(e) => {
                        tracing::warn!("{}; dropping article", e);
                        return Ok(None);
                    }
                };

                let _permit = analysis_pool
                    .acquire_owned()
                    .await
                    .map_err(|e| AnalysisError::TaskFailure(e.to_string()))?;
                if aborted.load(Ordering::SeqCst) {
                    tracing::debug!("Batch aborted; not analyzing article {}", article.article_id);
                    return Ok(None);
                }

                let analyzed = analyzer.analyze(&article).await;
                if analyzed.is_err() && abort_on_failure {
                    aborted.store(true, Ordering::SeqCst);
                }
                analyzed.map(Some)
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        let mut first_error: Option<AnalysisError> = None;

        for (index, handle) in handles.into_iter().enumerate() {
            let outcome = handle
                .await
                .unwrap_or_else(|e| Err(AnalysisError::TaskFailure(e.to_string())));

            match outcome {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::AbortBatch => {
                        tracing::error!("Article {} failed: {}", index + 1, e);
                        aborted.store(true, Ordering::SeqCst);
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                    }
                    FailurePolicy::SkipArticle => {
                        tracing::warn!("Skipping article {}: {}", index + 1, e);
                    }
                },
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        tracing::info!("Analyzed {}/{} articles", results.len(), article_ids.len());
        Ok(results)
    }
}

async fn fetch_article(
    fetcher: &dyn ArticleFetcher,
    article_id: &str,
    url: String,
) -> Result<FetchedArticle, AnalysisError> {
    tracing::debug!("Fetching article {} from {}", article_id, url);

    let page = fetcher.fetch(&url).await.map_err(|e| AnalysisError::FetchFailure {
        article_id: article_id.to_string(),
        reason: e.to_string(),
    })?;

    let content = page.content.ok_or_else(|| AnalysisError::FetchFailure {
        article_id: article_id.to_string(),
        reason: "no article content".to_string(),
    })?;

    Ok(FetchedArticle {
        article_id: article_id.to_string(),
        url,
        headline: page.headline.unwrap_or_default(),
        content,
    })
}
