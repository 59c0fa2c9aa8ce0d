use super::*;
use analysis_core::{
    FetchedPage, LabelScore, SentimentClassifier, SentimentLabel, SpokenTranslation, Summarizer,
    Capability, TopicClassifier, TopicLabel,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::AtomicUsize;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Makes the fetch of `fetched_id` wait until the analysis of `analyzed_id`
/// has started, and holds that analysis until the fetch has begun.
struct Handoff {
    analyzed_id: String,
    fetched_id: String,
    analysis_started: Notify,
    fetch_started: Notify,
}

/// Serves generated pages keyed by the article id at the end of the URL
#[derive(Default)]
struct MockFetcher {
    fetched: Mutex<Vec<String>>,
    missing: HashSet<String>,
    unreachable: HashSet<String>,
    /// Earlier articles respond more slowly than later ones
    staggered: bool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    handoff: Option<Arc<Handoff>>,
}

impl MockFetcher {
    fn fetch_count(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }
}

#[async_trait]
impl Capability for MockFetcher {
    fn name(&self) -> &'static str {
        "mock-fetcher"
    }
}

#[async_trait]
impl ArticleFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, CapabilityError> {
        let id = url.rsplit('/').next().unwrap_or_default().to_string();
        let position = {
            let mut fetched = self.fetched.lock().unwrap();
            fetched.push(id.clone());
            fetched.len()
        };

        if let Some(handoff) = self.handoff.as_ref().filter(|h| h.fetched_id == id) {
            handoff.analysis_started.notified().await;
            handoff.fetch_started.notify_one();
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if self.staggered {
            tokio::time::sleep(Duration::from_millis(60u64.saturating_sub(position as u64 * 5))).await;
        } else {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.unreachable.contains(&id) {
            return Err(CapabilityError::Unavailable("connection refused".to_string()));
        }
        if self.missing.contains(&id) {
            return Ok(FetchedPage::default());
        }

        let tone = if id.starts_with("c9") || id.starts_with("c0") {
            "great"
        } else {
            "terrible"
        };
        Ok(FetchedPage {
            headline: Some(format!("Headline {}", id)),
            content: Some(format!("Article {} body. Results were {} this quarter.", id, tone)),
        })
    }
}

/// Summaries echo the article body; a body containing a poisoned id fails.
#[derive(Default)]
struct MockSummarizer {
    poisoned: Option<String>,
    /// Time each summary takes
    delay_ms: u64,
    handoff: Option<Arc<Handoff>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockSummarizer {
    fn poisoned(id: &str) -> Self {
        Self {
            poisoned: Some(id.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Capability for MockSummarizer {
    fn name(&self) -> &'static str {
        "mock-summarizer"
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, text: &str, _min: usize, _max: usize) -> Result<String, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(handoff) = self.handoff.as_ref().filter(|h| text.contains(h.analyzed_id.as_str())) {
            handoff.analysis_started.notify_one();
            handoff.fetch_started.notified().await;
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(poisoned) = &self.poisoned {
            if text.contains(poisoned.as_str()) {
                return Err(CapabilityError::MalformedResponse("empty summary".to_string()));
            }
        }
        Ok(format!("Summary: {}", text))
    }
}

struct MockSentiment;

#[async_trait]
impl Capability for MockSentiment {
    fn name(&self) -> &'static str {
        "mock-sentiment"
    }
}

#[async_trait]
impl SentimentClassifier for MockSentiment {
    async fn classify_sentiment(&self, chunks: &[String]) -> Result<Vec<Vec<LabelScore>>, CapabilityError> {
        Ok(chunks
            .iter()
            .map(|chunk| {
                if chunk.contains("great") {
                    vec![LabelScore::new("positive", 0.9), LabelScore::new("negative", 0.1)]
                } else {
                    vec![LabelScore::new("positive", 0.2), LabelScore::new("negative", 0.7)]
                }
            })
            .collect())
    }
}

struct MockTopics;

#[async_trait]
impl Capability for MockTopics {
    fn name(&self) -> &'static str {
        "mock-topics"
    }
}

#[async_trait]
impl TopicClassifier for MockTopics {
    async fn classify_topics(&self, text: &str, _labels: &[&str]) -> Result<Vec<LabelScore>, CapabilityError> {
        let growth = if text.contains("great") { 0.9 } else { 0.3 };
        Ok(vec![
            LabelScore::new("Financial Growth", growth),
            LabelScore::new("Stock Market Performance", 0.6),
            LabelScore::new("Legal Disputes", 0.1),
        ])
    }
}

struct MockNarrator {
    calls: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl Capability for MockNarrator {
    fn name(&self) -> &'static str {
        "mock-narrator"
    }
}

#[async_trait]
impl Narrator for MockNarrator {
    async fn translate_and_speak(&self, text: &str) -> Result<SpokenTranslation, CapabilityError> {
        self.calls.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(CapabilityError::Unavailable("tts offline".to_string()));
        }
        Ok(SpokenTranslation {
            translated_text: format!("[hi] {}", text),
            audio_file: "output.mp3".to_string(),
        })
    }
}

struct Fixture {
    fetcher: Arc<MockFetcher>,
    summarizer: Arc<MockSummarizer>,
    narrator: Arc<MockNarrator>,
    orchestrator: PipelineOrchestrator,
}

fn fixture(
    fetcher: MockFetcher,
    summarizer: MockSummarizer,
    narrator_fails: bool,
    config: PipelineConfig,
) -> Fixture {
    let fetcher = Arc::new(fetcher);
    let summarizer = Arc::new(summarizer);
    let narrator = Arc::new(MockNarrator {
        calls: Mutex::new(Vec::new()),
        fail: narrator_fails,
    });
    let models = ExtractionModels::new(
        summarizer.clone(),
        Arc::new(MockSentiment),
        Arc::new(MockTopics),
    );
    let orchestrator = PipelineOrchestrator::new(
        CompanyRegistry::builtin(),
        fetcher.clone(),
        models,
        narrator.clone(),
        config,
    );
    Fixture {
        fetcher,
        summarizer,
        narrator,
        orchestrator,
    }
}

fn seeded() -> PipelineConfig {
    PipelineConfig {
        narrative_seed: Some(11),
        ..PipelineConfig::default()
    }
}

fn apple_ids() -> Vec<String> {
    CompanyRegistry::builtin().lookup("Apple").unwrap().to_vec()
}

#[tokio::test]
async fn test_apple_end_to_end() {
    let f = fixture(MockFetcher::default(), MockSummarizer::default(), false, seeded());
    let analysis = f.orchestrator.run_analysis("Apple").await.unwrap();

    assert_eq!(analysis.company, "Apple");
    assert_eq!(analysis.articles.len(), 10);
    assert_eq!(analysis.report.sentiment_distribution.total(), 10);
    // c9vy0m8ggz3o and c0l1kpz3w32o read positive, the other eight negative
    assert_eq!(analysis.report.sentiment_distribution.positive, 2);
    assert_eq!(analysis.report.sentiment_distribution.negative, 8);
    assert!(analysis.articles.iter().all(|a| a.topics.len() <= 2));
    assert!(analysis
        .report
        .topic_overlap
        .common_topics
        .contains(&TopicLabel::StockMarketPerformance));
    assert_eq!(analysis.report.topic_overlap.unique_topics_per_article.len(), 10);
    assert!(analysis.report.final_verdict.contains("Apple"));
    assert!(analysis.report.final_verdict.contains("largely negative"));

    assert_eq!(analysis.translated_text, format!("[hi] {}", analysis.report.final_verdict));
    assert_eq!(analysis.audio_file, "output.mp3");
    assert_eq!(f.narrator.calls.lock().unwrap().len(), 1);
    assert_eq!(f.fetcher.fetch_count(), 10);
}

#[tokio::test]
async fn test_unknown_company_fetches_nothing() {
    let f = fixture(MockFetcher::default(), MockSummarizer::default(), false, seeded());
    let err = f.orchestrator.run_analysis("Nonexistent").await.unwrap_err();

    assert!(matches!(err, AnalysisError::UnknownCompany(ref name) if name == "Nonexistent"));
    assert_eq!(f.fetcher.fetch_count(), 0);
    assert!(f.narrator.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_one_extraction_failure_aborts_batch() {
    let ids = apple_ids();
    let f = fixture(MockFetcher::default(), MockSummarizer::poisoned(&ids[3]), false, seeded());
    let err = f.orchestrator.run_analysis("Apple").await.unwrap_err();

    assert_eq!(err.article_id(), Some(ids[3].as_str()));
    assert!(matches!(err, AnalysisError::ExtractionFailure { .. }));
    assert!(f.narrator.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_abort_skips_articles_still_queued() {
    let ids = apple_ids();
    let config = PipelineConfig {
        fetch_concurrency: 1,
        analysis_concurrency: 1,
        ..seeded()
    };
    let f = fixture(MockFetcher::default(), MockSummarizer::poisoned(&ids[0]), false, config);
    let err = f.orchestrator.run_analysis("Apple").await.unwrap_err();

    assert_eq!(err.article_id(), Some(ids[0].as_str()));
    let summaries = f.summarizer.calls.load(Ordering::SeqCst);
    assert!(summaries < 10, "summaries requested after failure: {}", summaries);
    assert!(f.fetcher.fetch_count() < 10);
}

#[tokio::test]
async fn test_skip_policy_drops_failed_article() {
    let ids = apple_ids();
    let config = PipelineConfig {
        failure_policy: FailurePolicy::SkipArticle,
        ..seeded()
    };
    let f = fixture(MockFetcher::default(), MockSummarizer::poisoned(&ids[3]), false, config);
    let analysis = f.orchestrator.run_analysis("Apple").await.unwrap();

    assert_eq!(analysis.articles.len(), 9);
    assert!(analysis
        .articles
        .iter()
        .all(|a| a.headline != format!("Headline {}", ids[3])));
}

#[tokio::test]
async fn test_results_keep_article_order() {
    let fetcher = MockFetcher {
        staggered: true,
        ..MockFetcher::default()
    };
    let config = PipelineConfig {
        fetch_concurrency: 10,
        analysis_concurrency: 10,
        ..seeded()
    };
    let f = fixture(fetcher, MockSummarizer::default(), false, config);
    let analysis = f.orchestrator.run_analysis("Apple").await.unwrap();

    let headlines: Vec<String> = analysis.articles.iter().map(|a| a.headline.clone()).collect();
    let expected: Vec<String> = apple_ids().iter().map(|id| format!("Headline {}", id)).collect();
    assert_eq!(headlines, expected);
}

#[tokio::test]
async fn test_fetch_concurrency_is_bounded() {
    let config = PipelineConfig {
        fetch_concurrency: 2,
        ..seeded()
    };
    let f = fixture(MockFetcher::default(), MockSummarizer::default(), false, config);
    f.orchestrator.run_analysis("Apple").await.unwrap();

    let peak = f.fetcher.max_in_flight.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 2, "peak in-flight fetches: {}", peak);
}

#[tokio::test]
async fn test_analysis_concurrency_is_bounded() {
    let config = PipelineConfig {
        fetch_concurrency: 10,
        analysis_concurrency: 2,
        ..seeded()
    };
    let summarizer = MockSummarizer {
        delay_ms: 10,
        ..MockSummarizer::default()
    };
    let f = fixture(MockFetcher::default(), summarizer, false, config);
    f.orchestrator.run_analysis("Apple").await.unwrap();

    let peak = f.summarizer.max_in_flight.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 2, "peak in-flight analyses: {}", peak);
    assert_eq!(f.summarizer.calls.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn test_fetch_overlaps_earlier_analysis() {
    let ids = apple_ids();
    let handoff = Arc::new(Handoff {
        analyzed_id: ids[0].clone(),
        fetched_id: ids[1].clone(),
        analysis_started: Notify::new(),
        fetch_started: Notify::new(),
    });
    let fetcher = MockFetcher {
        handoff: Some(handoff.clone()),
        ..MockFetcher::default()
    };
    let summarizer = MockSummarizer {
        handoff: Some(handoff),
        ..MockSummarizer::default()
    };
    let config = PipelineConfig {
        fetch_concurrency: 1,
        analysis_concurrency: 1,
        ..seeded()
    };
    let f = fixture(fetcher, summarizer, false, config);

    // Deadlocks unless article 2 is fetched while article 1 is being analyzed
    let analysis = tokio::time::timeout(Duration::from_secs(5), f.orchestrator.run_analysis("Apple"))
        .await
        .expect("fetching stalled behind analysis")
        .unwrap();
    assert_eq!(analysis.articles.len(), 10);
}

#[tokio::test]
async fn test_fetch_failures_are_dropped() {
    let ids = apple_ids();
    let fetcher = MockFetcher {
        missing: HashSet::from([ids[0].clone()]),
        unreachable: HashSet::from([ids[9].clone()]),
        ..MockFetcher::default()
    };
    let f = fixture(fetcher, MockSummarizer::default(), false, seeded());
    let analysis = f.orchestrator.run_analysis("Apple").await.unwrap();

    assert_eq!(analysis.articles.len(), 8);
    assert_eq!(analysis.articles[0].headline, format!("Headline {}", ids[1]));
    assert_eq!(analysis.report.sentiment_distribution.total(), 8);
}

#[tokio::test]
async fn test_no_fetched_articles_is_insufficient_data() {
    let fetcher = MockFetcher {
        missing: apple_ids().into_iter().collect(),
        ..MockFetcher::default()
    };
    let f = fixture(fetcher, MockSummarizer::default(), false, seeded());
    let err = f.orchestrator.run_analysis("Apple").await.unwrap_err();

    assert!(matches!(err, AnalysisError::InsufficientData(_)));
}

#[tokio::test]
async fn test_narration_failure_is_reported() {
    let f = fixture(MockFetcher::default(), MockSummarizer::default(), true, seeded());
    let err = f.orchestrator.run_analysis("Apple").await.unwrap_err();

    assert!(matches!(err, AnalysisError::NarrationFailure(CapabilityError::Unavailable(_))));
}

#[tokio::test]
async fn test_seeded_runs_share_narrative() {
    let a = fixture(MockFetcher::default(), MockSummarizer::default(), false, seeded());
    let b = fixture(MockFetcher::default(), MockSummarizer::default(), false, seeded());

    let first = a.orchestrator.run_analysis("Tesla").await.unwrap();
    let second = b.orchestrator.run_analysis("Tesla").await.unwrap();
    assert_eq!(first.report, second.report);
    assert!(first.report.thematic_comparison.starts_with("Article 1 "));
    assert_eq!(first.articles[0].sentiment, SentimentLabel::Positive);
}

#[test]
fn test_failure_policy_parsing() {
    assert_eq!("abort".parse::<FailurePolicy>().unwrap(), FailurePolicy::AbortBatch);
    assert_eq!("Skip".parse::<FailurePolicy>().unwrap(), FailurePolicy::SkipArticle);
    assert!("retry".parse::<FailurePolicy>().is_err());
    assert_eq!(FailurePolicy::default().to_string(), "abort");
}
