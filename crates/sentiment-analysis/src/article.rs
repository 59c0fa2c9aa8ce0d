use analysis_core::text::{split_text, truncate_chars};
use analysis_core::{
    AnalysisError, ArticleResult, CapabilityError, FetchedArticle, LabelScore, TopicLabel,
};
use std::collections::BTreeMap;

use crate::aggregate::SentimentTotals;
use crate::models::ExtractionModels;

/// Topics kept per article
pub const MAX_TOPICS: usize = 2;

#[derive(Debug, Clone)]
pub struct ArticleAnalyzerConfig {
    /// Article text beyond this many characters is ignored
    pub max_input_chars: usize,
    /// Chunk bound for the sentiment model
    pub chunk_chars: usize,
    pub summary_min_length: usize,
    pub summary_max_length: usize,
}

impl Default for ArticleAnalyzerConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 3200,
            chunk_chars: 1024,
            summary_min_length: 100,
            summary_max_length: 200,
        }
    }
}

/// Runs summary, sentiment and topic extraction for one article.
///
/// Summary and sentiment run concurrently; topic extraction waits for the
/// summary because it classifies the summary text.
#[derive(Clone)]
pub struct ArticleAnalyzer {
    models: ExtractionModels,
    config: ArticleAnalyzerConfig,
}

impl ArticleAnalyzer {
    pub fn new(models: ExtractionModels, config: ArticleAnalyzerConfig) -> Self {
        Self { models, config }
    }

    pub fn models(&self) -> &ExtractionModels {
        &self.models
    }

    pub fn config(&self) -> &ArticleAnalyzerConfig {
        &self.config
    }

    pub async fn analyze(&self, article: &FetchedArticle) -> Result<ArticleResult, AnalysisError> {
        let article_id = article.article_id.as_str();
        let text = truncate_chars(&article.content, self.config.max_input_chars);
        let chunks = split_text(text, self.config.chunk_chars);

        tracing::info!(
            "Analyzing article {} ({} chars, {} chunks)",
            article_id,
            text.chars().count(),
            chunks.len()
        );

        let summary_task = self.models.summarizer.summarize(
            text,
            self.config.summary_min_length,
            self.config.summary_max_length,
        );
        let sentiment_task = async {
            let scores = self.models.sentiment.classify_sentiment(&chunks).await?;
            Ok::<_, CapabilityError>(SentimentTotals::from_chunks(&scores))
        };

        let (summary, totals) = tokio::try_join!(summary_task, sentiment_task).map_err(|e| {
            tracing::warn!("Extraction failed for article {}: {}", article_id, e);
            AnalysisError::extraction(article_id, e)
        })?;
        let sentiment = totals.dominant();

        let vocabulary = TopicLabel::vocabulary();
        let topic_scores = self
            .models
            .topics
            .classify_topics(&summary, &vocabulary)
            .await
            .map_err(|e| {
                tracing::warn!("Topic extraction failed for article {}: {}", article_id, e);
                AnalysisError::extraction(article_id, e)
            })?;
        let topics = select_top_topics(&topic_scores, MAX_TOPICS);

        tracing::debug!(
            "Article {}: sentiment {} (totals {:?}), topics {:?}",
            article_id,
            sentiment,
            totals,
            topics
        );

        Ok(ArticleResult {
            headline: article.headline.clone(),
            summary,
            sentiment,
            topics,
        })
    }
}

/// Pick the `limit` highest-scoring vocabulary topics, best first.
///
/// Labels outside the vocabulary are dropped, a repeated label keeps its best
/// score, non-finite scores rank last and equal scores keep vocabulary order.
pub fn select_top_topics(scores: &[LabelScore], limit: usize) -> Vec<TopicLabel> {
    let mut best: BTreeMap<TopicLabel, f64> = BTreeMap::new();
    for entry in scores {
        let Some(topic) = TopicLabel::from_label(&entry.label) else {
            continue;
        };
        let score = if entry.score.is_finite() {
            entry.score
        } else {
            f64::NEG_INFINITY
        };
        best.entry(topic)
            .and_modify(|current| {
                if score > *current {
                    *current = score;
                }
            })
            .or_insert(score);
    }

    let mut ranked: Vec<(TopicLabel, f64)> = best.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(topic, _)| topic).collect()
}
