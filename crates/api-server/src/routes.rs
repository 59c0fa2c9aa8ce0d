//! Company news analysis endpoints.
//!
//! `POST /analyze_articles/` answers in the layout the dashboard client reads
//! (`analysis_data`, `audio_file`, `translated_text` with title-cased keys).
//! The `/api/*` routes use the `ApiResponse` envelope.

use analysis_core::{
    ArticleResult, CompanyAnalysis, ComparativeReport, SentimentDistribution, SentimentLabel,
    TopicLabel,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ApiResponse, AppError, AppState};

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/companies", get(list_companies))
        .route("/api/analysis/:company", get(get_company_analysis))
        .route("/analyze_articles/", post(analyze_articles))
}

#[derive(Debug, Deserialize)]
pub struct CompanyRequest {
    pub company_name: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeArticlesResponse {
    pub analysis_data: AnalysisData,
    /// Path of the synthesized audio file
    pub audio_file: String,
    pub translated_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisData {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Articles")]
    pub articles: Vec<ArticleEntry>,
    #[serde(rename = "Comparative Sentiment Score")]
    pub comparative: ComparativeEntry,
}

#[derive(Debug, Serialize)]
pub struct ArticleEntry {
    pub headline: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: SentimentLabel,
    #[serde(rename = "Topics")]
    pub topics: Vec<TopicLabel>,
}

#[derive(Debug, Serialize)]
pub struct ComparativeEntry {
    #[serde(rename = "Sentiment Distribution")]
    pub sentiment_distribution: SentimentDistribution,
    #[serde(rename = "Comparative Thematic Insights")]
    pub thematic_insights: String,
    #[serde(rename = "Topic Overlap")]
    pub topic_overlap: TopicOverlapEntry,
    #[serde(rename = "Final Sentiment Analysis")]
    pub final_sentiment: String,
}

#[derive(Debug, Serialize)]
pub struct TopicOverlapEntry {
    #[serde(rename = "Common Topics")]
    pub common_topics: Vec<TopicLabel>,
    #[serde(flatten)]
    pub unique_topics: UniqueTopics,
}

/// Per-article unique topics keyed by zero-based article index, written as
/// "Unique Topics in Article N" (1-based) in article order.
#[derive(Debug, Default)]
pub struct UniqueTopics(pub BTreeMap<usize, Vec<TopicLabel>>);

impl Serialize for UniqueTopics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (index, topics) in &self.0 {
            map.serialize_entry(&format!("Unique Topics in Article {}", index + 1), topics)?;
        }
        map.end()
    }
}

impl From<ArticleResult> for ArticleEntry {
    fn from(article: ArticleResult) -> Self {
        Self {
            headline: article.headline,
            summary: article.summary,
            sentiment: article.sentiment,
            topics: article.topics,
        }
    }
}

impl From<ComparativeReport> for ComparativeEntry {
    fn from(report: ComparativeReport) -> Self {
        let overlap = report.topic_overlap;
        let unique_topics = overlap
            .unique_topics_per_article
            .into_iter()
            .map(|(index, topics)| (index, topics.into_iter().collect()))
            .collect();

        Self {
            sentiment_distribution: report.sentiment_distribution,
            thematic_insights: report.thematic_comparison,
            topic_overlap: TopicOverlapEntry {
                common_topics: overlap.common_topics.into_iter().collect(),
                unique_topics: UniqueTopics(unique_topics),
            },
            final_sentiment: report.final_verdict,
        }
    }
}

impl From<CompanyAnalysis> for AnalyzeArticlesResponse {
    fn from(analysis: CompanyAnalysis) -> Self {
        Self {
            analysis_data: AnalysisData {
                company: analysis.company,
                articles: analysis.articles.into_iter().map(ArticleEntry::from).collect(),
                comparative: ComparativeEntry::from(analysis.report),
            },
            audio_file: analysis.audio_file,
            translated_text: analysis.translated_text,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub companies: usize,
    pub failure_policy: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CompaniesResponse {
    pub companies: Vec<String>,
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello, World!" }))
}

async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let orchestrator = &state.orchestrator;
    Json(ApiResponse::success(HealthResponse {
        status: "ok",
        companies: orchestrator.registry().len(),
        failure_policy: orchestrator.config().failure_policy.to_string(),
        timestamp: Utc::now(),
    }))
}

async fn list_companies(State(state): State<AppState>) -> Json<ApiResponse<CompaniesResponse>> {
    let companies = state
        .orchestrator
        .registry()
        .companies()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(ApiResponse::success(CompaniesResponse { companies }))
}

/// Full typed analysis for one company
async fn get_company_analysis(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> Result<Json<ApiResponse<CompanyAnalysis>>, AppError> {
    let analysis = state
        .orchestrator
        .run_analysis(&company)
        .await
        .map_err(AppError::from_analysis)?;
    Ok(Json(ApiResponse::success(analysis)))
}

/// Fetch, analyze and compare the selected company's articles
async fn analyze_articles(
    State(state): State<AppState>,
    Json(request): Json<CompanyRequest>,
) -> Result<Json<AnalyzeArticlesResponse>, AppError> {
    tracing::info!("Received analysis request for {}", request.company_name);

    let analysis = state
        .orchestrator
        .run_analysis(&request.company_name)
        .await
        .map_err(AppError::from_analysis)?;
    Ok(Json(AnalyzeArticlesResponse::from(analysis)))
}
