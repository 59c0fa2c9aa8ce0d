use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Sentiment class assigned to an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Tie-break priority: earlier entries win exact ties.
    pub const PRIORITY: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }

    /// Parse a model label ("positive", "Positive", "POSITIVE", ...).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Some(SentimentLabel::Positive),
            "NEGATIVE" => Some(SentimentLabel::Negative),
            "NEUTRAL" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }

    /// Pick the label with the strictly highest value, resolving exact ties
    /// by `PRIORITY` order.
    pub fn dominant_by<F>(mut value_of: F) -> Self
    where
        F: FnMut(SentimentLabel) -> f64,
    {
        let mut best = SentimentLabel::PRIORITY[0];
        let mut best_value = value_of(best);
        for label in &SentimentLabel::PRIORITY[1..] {
            let value = value_of(*label);
            if value > best_value {
                best = *label;
                best_value = value;
            }
        }
        best
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business-news topic category. Closed vocabulary; declaration order is
/// the tie-break order for equally scored topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TopicLabel {
    #[serde(rename = "Financial Growth")]
    FinancialGrowth,
    #[serde(rename = "Stock Market Performance")]
    StockMarketPerformance,
    #[serde(rename = "Regulatory Issues")]
    RegulatoryIssues,
    #[serde(rename = "Legal Disputes")]
    LegalDisputes,
    #[serde(rename = "Public Sentiment & Protests")]
    PublicSentimentProtests,
    #[serde(rename = "Government Policies")]
    GovernmentPolicies,
    #[serde(rename = "Technological Innovations")]
    TechnologicalInnovations,
    #[serde(rename = "Market Competition")]
    MarketCompetition,
    #[serde(rename = "Leadership Decisions")]
    LeadershipDecisions,
}

impl TopicLabel {
    pub const ALL: [TopicLabel; 9] = [
        TopicLabel::FinancialGrowth,
        TopicLabel::StockMarketPerformance,
        TopicLabel::RegulatoryIssues,
        TopicLabel::LegalDisputes,
        TopicLabel::PublicSentimentProtests,
        TopicLabel::GovernmentPolicies,
        TopicLabel::TechnologicalInnovations,
        TopicLabel::MarketCompetition,
        TopicLabel::LeadershipDecisions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicLabel::FinancialGrowth => "Financial Growth",
            TopicLabel::StockMarketPerformance => "Stock Market Performance",
            TopicLabel::RegulatoryIssues => "Regulatory Issues",
            TopicLabel::LegalDisputes => "Legal Disputes",
            TopicLabel::PublicSentimentProtests => "Public Sentiment & Protests",
            TopicLabel::GovernmentPolicies => "Government Policies",
            TopicLabel::TechnologicalInnovations => "Technological Innovations",
            TopicLabel::MarketCompetition => "Market Competition",
            TopicLabel::LeadershipDecisions => "Leadership Decisions",
        }
    }

    /// Candidate label strings handed to the zero-shot classifier
    pub fn vocabulary() -> Vec<&'static str> {
        TopicLabel::ALL.iter().map(|t| t.as_str()).collect()
    }

    /// Position in the vocabulary (0-based)
    pub fn rank(&self) -> usize {
        *self as usize
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        TopicLabel::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for TopicLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `{label, score}` entry as returned by a classification model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Raw result of fetching one article page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchedPage {
    pub headline: Option<String>,
    pub content: Option<String>,
}

/// An article that was fetched with usable content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedArticle {
    pub article_id: String,
    pub url: String,
    pub headline: String,
    pub content: String,
}

/// Per-article extraction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleResult {
    pub headline: String,
    pub summary: String,
    pub sentiment: SentimentLabel,
    /// At most two topics, most relevant first
    pub topics: Vec<TopicLabel>,
}

impl ArticleResult {
    pub fn primary_topic(&self) -> Option<TopicLabel> {
        self.topics.first().copied()
    }

    pub fn topic_set(&self) -> BTreeSet<TopicLabel> {
        self.topics.iter().copied().collect()
    }
}

/// Article counts per sentiment class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    #[serde(rename = "POSITIVE")]
    pub positive: usize,
    #[serde(rename = "NEGATIVE")]
    pub negative: usize,
    #[serde(rename = "NEUTRAL")]
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = SentimentLabel>,
    {
        let mut distribution = Self::default();
        for label in labels {
            distribution.record(label);
        }
        distribution
    }

    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Label with the highest count; ties go to the earlier label in
    /// `SentimentLabel::PRIORITY`.
    pub fn dominant(&self) -> SentimentLabel {
        SentimentLabel::dominant_by(|label| self.count(label) as f64)
    }
}

/// Topics shared by every article, and what each article adds on top
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicOverlapReport {
    pub common_topics: BTreeSet<TopicLabel>,
    /// Keyed by 0-based article index; every article is present
    pub unique_topics_per_article: BTreeMap<usize, BTreeSet<TopicLabel>>,
}

/// Cross-article comparison built once per analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeReport {
    pub sentiment_distribution: SentimentDistribution,
    pub thematic_comparison: String,
    pub topic_overlap: TopicOverlapReport,
    pub final_verdict: String,
}

/// Translated verdict and the synthesized audio for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenTranslation {
    pub translated_text: String,
    pub audio_file: String,
}

/// Complete output of one company analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAnalysis {
    pub company: String,
    pub timestamp: DateTime<Utc>,
    pub articles: Vec<ArticleResult>,
    pub report: ComparativeReport,
    pub translated_text: String,
    pub audio_file: String,
}
