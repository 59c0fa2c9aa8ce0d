//! Cross-article comparison.
//!
//! Combines the ordered per-article results for one company into a
//! `ComparativeReport`: how sentiment is distributed, a short narrative
//! contrasting the articles' main topics, which topics every article shares,
//! and a one-sentence verdict.

use analysis_core::{
    AnalysisError, ArticleResult, ComparativeReport, SentimentDistribution, SentimentLabel,
    TopicLabel, TopicOverlapReport,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};

pub const VERB_PHRASES: [&str; 6] = [
    "is about",
    "focuses on",
    "discusses",
    "highlights",
    "explores",
    "centers on",
];

pub const CONNECTIVES: [&str; 4] = ["while", "whereas", "however", "on the other hand"];

/// Rendered in place of the primary topic when an article has none
pub const UNCLASSIFIED_TOPIC: &str = "an unclassified topic";

#[derive(Debug, Clone, Default)]
pub struct ComparativeAnalyzer {
    seed: Option<u64>,
}

impl ComparativeAnalyzer {
    /// Narrative wording is drawn from OS entropy
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Deterministic narrative wording for a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Build the comparative report for `articles`, in their original order.
    pub async fn compare(
        &self,
        company: &str,
        articles: &[ArticleResult],
    ) -> Result<ComparativeReport, AnalysisError> {
        if articles.is_empty() {
            return Err(AnalysisError::InsufficientData(format!(
                "no analyzed articles for {}",
                company
            )));
        }

        let mut rng = self.rng();
        let (sentiment_distribution, thematic_comparison, topic_overlap) = tokio::join!(
            async { sentiment_distribution(articles) },
            async { thematic_comparison(articles, &mut rng) },
            async { topic_overlap(articles) },
        );

        let final_verdict = final_verdict(company, &sentiment_distribution);

        tracing::info!(
            "Comparative report for {}: {} articles, distribution {:?}, {} common topics",
            company,
            articles.len(),
            sentiment_distribution,
            topic_overlap.common_topics.len()
        );

        Ok(ComparativeReport {
            sentiment_distribution,
            thematic_comparison,
            topic_overlap,
            final_verdict,
        })
    }
}

pub fn sentiment_distribution(articles: &[ArticleResult]) -> SentimentDistribution {
    SentimentDistribution::from_labels(articles.iter().map(|a| a.sentiment))
}

/// One sentence per article contrasting its primary topic with the next.
///
/// Every sentence but the last ends in a connective that runs into the next
/// one. A single article produces no comparison at all.
pub fn thematic_comparison<R: Rng + ?Sized>(articles: &[ArticleResult], rng: &mut R) -> String {
    if articles.len() < 2 {
        return String::new();
    }

    let last = articles.len() - 1;
    let mut sentences = Vec::with_capacity(articles.len());

    for (i, article) in articles.iter().enumerate() {
        let topic = article
            .primary_topic()
            .map(|t| t.as_str())
            .unwrap_or(UNCLASSIFIED_TOPIC);
        let verb = VERB_PHRASES.choose(rng).copied().unwrap_or(VERB_PHRASES[0]);

        if i < last {
            let connective = CONNECTIVES.choose(rng).copied().unwrap_or(CONNECTIVES[0]);
            sentences.push(format!("Article {} {} {}, {}", i + 1, verb, topic, connective));
        } else {
            sentences.push(format!("Article {} {} {}.", i + 1, verb, topic));
        }
    }

    sentences.join(" ")
}

pub fn topic_overlap(articles: &[ArticleResult]) -> TopicOverlapReport {
    let topic_sets: Vec<BTreeSet<TopicLabel>> = articles.iter().map(|a| a.topic_set()).collect();

    let common_topics: BTreeSet<TopicLabel> = match topic_sets.split_first() {
        Some((first, rest)) => first
            .iter()
            .filter(|topic| rest.iter().all(|set| set.contains(topic)))
            .copied()
            .collect(),
        None => BTreeSet::new(),
    };

    let unique_topics_per_article: BTreeMap<usize, BTreeSet<TopicLabel>> = topic_sets
        .iter()
        .enumerate()
        .map(|(i, set)| (i, set.difference(&common_topics).copied().collect()))
        .collect();

    TopicOverlapReport {
        common_topics,
        unique_topics_per_article,
    }
}

pub fn final_verdict(company: &str, distribution: &SentimentDistribution) -> String {
    match distribution.dominant() {
        SentimentLabel::Positive => format!(
            "{company}’s latest news coverage is mostly positive. Potential stock growth expected."
        ),
        SentimentLabel::Negative => format!(
            "{company}’s recent news coverage is largely negative. Market confidence may decline."
        ),
        SentimentLabel::Neutral => format!(
            "{company}’s news coverage remains neutral. Investors may adopt a wait-and-see approach."
        ),
    }
}
