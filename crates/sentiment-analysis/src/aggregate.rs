//! Chunk-level sentiment aggregation.
//!
//! Long articles are scored chunk by chunk. Every `{label, score}` entry from
//! every chunk adds its score to that label's running total; the article's
//! sentiment is the label with the largest total.

use analysis_core::{LabelScore, SentimentLabel};
use serde::{Deserialize, Serialize};

/// Summed confidence per sentiment label across all chunks
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentTotals {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentTotals {
    pub fn from_chunks(chunk_scores: &[Vec<LabelScore>]) -> Self {
        let mut totals = Self::default();
        for entry in chunk_scores.iter().flatten() {
            totals.add(entry);
        }
        totals
    }

    /// Add one entry; labels outside the sentiment vocabulary are ignored.
    pub fn add(&mut self, entry: &LabelScore) {
        if !entry.score.is_finite() {
            return;
        }
        match SentimentLabel::from_label(&entry.label) {
            Some(SentimentLabel::Positive) => self.positive += entry.score,
            Some(SentimentLabel::Negative) => self.negative += entry.score,
            Some(SentimentLabel::Neutral) => self.neutral += entry.score,
            None => {}
        }
    }

    pub fn get(&self, label: SentimentLabel) -> f64 {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    /// Label with the strictly highest total. Exact ties resolve in
    /// POSITIVE, NEGATIVE, NEUTRAL order.
    pub fn dominant(&self) -> SentimentLabel {
        SentimentLabel::dominant_by(|label| self.get(label))
    }
}

/// Reduce per-chunk sentiment scores to one article label.
pub fn aggregate_sentiment(chunk_scores: &[Vec<LabelScore>]) -> SentimentLabel {
    SentimentTotals::from_chunks(chunk_scores).dominant()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(entries: &[(&str, f64)]) -> Vec<LabelScore> {
        entries
            .iter()
            .map(|(label, score)| LabelScore::new(*label, *score))
            .collect()
    }

    #[test]
    fn test_sums_across_chunks() {
        let scores = vec![
            chunk(&[("POSITIVE", 0.9)]),
            chunk(&[("NEGATIVE", 0.95), ("POSITIVE", 0.1)]),
        ];
        let totals = SentimentTotals::from_chunks(&scores);
        assert!((totals.positive - 1.0).abs() < 1e-9);
        assert!((totals.negative - 0.95).abs() < 1e-9);
        assert_eq!(aggregate_sentiment(&scores), SentimentLabel::Positive);
    }

    #[test]
    fn test_exact_tie_prefers_positive() {
        let scores = vec![chunk(&[("POSITIVE", 0.5)]), chunk(&[("NEGATIVE", 0.5)])];
        assert_eq!(aggregate_sentiment(&scores), SentimentLabel::Positive);
    }

    #[test]
    fn test_negative_neutral_tie_prefers_negative() {
        let scores = vec![chunk(&[("neutral", 0.7), ("negative", 0.7), ("positive", 0.1)])];
        assert_eq!(aggregate_sentiment(&scores), SentimentLabel::Negative);
    }

    #[test]
    fn test_model_labels_are_case_insensitive() {
        let scores = vec![chunk(&[("neutral", 0.8)]), chunk(&[("Neutral", 0.6), ("positive", 0.3)])];
        assert_eq!(aggregate_sentiment(&scores), SentimentLabel::Neutral);
    }

    #[test]
    fn test_unknown_labels_and_nan_ignored() {
        let scores = vec![chunk(&[("LABEL_7", 5.0), ("negative", f64::NAN), ("negative", 0.2)])];
        let totals = SentimentTotals::from_chunks(&scores);
        assert_eq!(totals.positive, 0.0);
        assert!((totals.negative - 0.2).abs() < 1e-9);
        assert_eq!(totals.dominant(), SentimentLabel::Negative);
    }

    #[test]
    fn test_no_scores_defaults_to_first_priority() {
        assert_eq!(aggregate_sentiment(&[]), SentimentLabel::Positive);
    }
}
