use analysis_core::{ArticleFetcher, Capability, CapabilityError, FetchedPage};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

pub mod parser;
pub use parser::{parse_article_html, ParsedArticle};

pub const DEFAULT_URL_TEMPLATE: &str = "https://www.bbc.com/news/articles/{id}";

const USER_AGENT: &str = "Mozilla/5.0";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid selector {0}")]
    Selector(String),
}

impl From<FetchError> for CapabilityError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Request(e) if e.is_timeout() || e.is_connect() => {
                CapabilityError::Unavailable(e.to_string())
            }
            FetchError::Request(e) => CapabilityError::Request(e.to_string()),
            FetchError::Selector(msg) => CapabilityError::MalformedResponse(msg),
        }
    }
}

/// Expand an article URL template: `{id}` is replaced by the article identifier.
pub fn article_url(template: &str, article_id: &str) -> String {
    template.replace("{id}", article_id)
}

/// Scrapes news article pages over HTTP
#[derive(Clone)]
pub struct HtmlArticleFetcher {
    client: Client,
}

impl HtmlArticleFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Fetch one page. A non-success status yields an empty page rather than
    /// an error.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            tracing::warn!("Failed to retrieve the article: {} (HTTP {})", url, response.status());
            return Ok(FetchedPage::default());
        }

        let html = response.text().await?;
        let parsed = parse_article_html(&html)?;

        let content = if parsed.content.trim().is_empty() {
            None
        } else {
            Some(parsed.content)
        };

        Ok(FetchedPage {
            headline: Some(parsed.headline),
            content,
        })
    }
}

impl Default for HtmlArticleFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl Capability for HtmlArticleFetcher {
    fn name(&self) -> &'static str {
        "article-fetcher"
    }
}

#[async_trait]
impl ArticleFetcher for HtmlArticleFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, CapabilityError> {
        Ok(self.fetch_page(url).await?)
    }
}
