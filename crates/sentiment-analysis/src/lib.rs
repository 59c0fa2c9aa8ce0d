//! Per-article extraction and cross-article comparison.
//!
//! `ArticleAnalyzer` turns one fetched article into an `ArticleResult`
//! (summary, sentiment, top topics) using the injected `ExtractionModels`.
//! `ComparativeAnalyzer` folds the ordered results for a company into a
//! `ComparativeReport`.

pub mod aggregate;
pub mod article;
pub mod comparative;
pub mod models;

pub use aggregate::{aggregate_sentiment, SentimentTotals};
pub use article::{select_top_topics, ArticleAnalyzer, ArticleAnalyzerConfig, MAX_TOPICS};
pub use comparative::{
    final_verdict, sentiment_distribution, thematic_comparison, topic_overlap,
    ComparativeAnalyzer,
};
pub use models::ExtractionModels;
