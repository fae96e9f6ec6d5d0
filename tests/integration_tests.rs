//! Integration tests for job scout

use job_scout::config::{Config, OutputFormat};
use job_scout::error::{JobScoutError, Result};
use job_scout::input::manager::SourceManager;
use job_scout::input::sources::{JsonFileSource, StaticSource};
use job_scout::input::{Posting, PostingSource};
use job_scout::llm::advisor::{AdviceComposer, AdviceOrigin, ADVICE_SECTIONS};
use job_scout::llm::generator::{Generation, TextGenerator};
use job_scout::output::formatter::ReportGenerator;
use job_scout::processing::skill_gap::UpskillingOutcome;
use job_scout::processing::{AnalysisEngine, SearchRequest};
use std::path::Path;

struct DownSource;

impl PostingSource for DownSource {
    fn name(&self) -> &str {
        "Down"
    }

    fn fetch(&self, _location: &str, _query: &str) -> Result<Vec<Posting>> {
        Err(JobScoutError::SourceUnavailable {
            source_name: "Down".to_string(),
            message: "connection refused".to_string(),
        })
    }
}

struct UnavailableGenerator;

impl TextGenerator for UnavailableGenerator {
    fn generate(&self, _prompt: &str) -> Result<Generation> {
        Err(JobScoutError::GenerationServiceUnavailable { attempts: Vec::new() })
    }
}

fn fixture_engine() -> AnalysisEngine {
    let sources = SourceManager::new().with_source(JsonFileSource::new(Path::new(
        "tests/fixtures/postings.json",
    )));
    AnalysisEngine::new(sources, &Config::default())
}

fn request() -> SearchRequest {
    SearchRequest::new("python, sql", "Pune", "entry")
}

#[test]
fn test_python_posting_ranks_first() {
    let report = fixture_engine().search(&request(), false).unwrap();

    assert_eq!(report.opportunities.len(), 3);
    assert_eq!(report.opportunities[0].posting.title, "Junior Python Developer");
    assert_eq!(report.opportunities[0].skill_relevance, 100.0);
    assert_eq!(report.opportunities[0].posting.source, "File");

    for pair in report.opportunities.windows(2) {
        assert!(pair[0].match_score >= pair[1].match_score);
    }
    for opp in &report.opportunities {
        assert!((0.0..=1.0).contains(&opp.match_score));
    }
}

#[test]
fn test_upskilling_skips_declared_skills() {
    let report = fixture_engine().search(&request(), false).unwrap();

    let terms: Vec<String> = report
        .upskilling
        .suggestions()
        .iter()
        .map(|s| s.term.to_lowercase())
        .collect();
    assert!(!terms.is_empty());
    assert!(!terms.contains(&"python".to_string()));
    assert!(!terms.contains(&"sql".to_string()));
    assert!(terms.iter().all(|t| t.len() >= 3));
}

#[test]
fn test_failing_source_does_not_stop_search() {
    let sources = SourceManager::new()
        .with_source(DownSource)
        .with_source(StaticSource::new(
            "Static",
            vec![Posting::new("Python Developer", "Python and SQL in Pune")],
        ));
    let engine = AnalysisEngine::new(sources, &Config::default());

    let report = engine.search(&request(), false).unwrap();

    assert_eq!(report.opportunities.len(), 1);
    assert_eq!(report.metadata.failed_sources, vec!["Down"]);
    assert_eq!(report.metadata.sources_used, vec!["Static"]);
}

#[test]
fn test_no_postings_is_a_normal_outcome() {
    let engine = AnalysisEngine::new(SourceManager::new().with_source(DownSource), &Config::default());
    let report = engine.search(&request(), true).unwrap();

    let text = ReportGenerator::with_options(false, 5, true)
        .generate_report(&report, OutputFormat::Console)
        .unwrap();
    assert!(text.contains("No matching opportunities found."));

    assert!(!report.has_opportunities());
    assert_eq!(report.upskilling, UpskillingOutcome::NoOpportunities);
    assert_eq!(report.advice.unwrap().origin, AdviceOrigin::NoOpportunities);
}

#[test]
fn test_generation_failure_uses_template_advice() {
    let config = Config::default();
    let advisor = AdviceComposer::new(&config.analysis).with_generator(Box::new(UnavailableGenerator));
    let engine = fixture_engine().with_advisor(advisor);

    let report = engine.search(&request(), true).unwrap();
    let advice = report.advice.unwrap();

    assert!(matches!(advice.origin, AdviceOrigin::Fallback { .. }));
    for section in ADVICE_SECTIONS {
        assert!(advice.text.contains(section));
    }
}

#[test]
fn test_equal_scores_keep_source_order() {
    let postings: Vec<Posting> = (0..4)
        .map(|i| Posting::new("Welder", "Metal fabrication shop floor").with_url(format!("u{}", i)))
        .collect();
    let engine = AnalysisEngine::new(
        SourceManager::new().with_source(StaticSource::new("Static", postings)),
        &Config::default(),
    );

    let report = engine.search(&request(), false).unwrap();
    let urls: Vec<&str> = report.opportunities.iter().map(|o| o.posting.url.as_str()).collect();
    assert_eq!(urls, vec!["u0", "u1", "u2", "u3"]);
}

#[test]
fn test_json_report_contains_ranked_postings() {
    let report = fixture_engine().search(&request(), false).unwrap();
    let json = ReportGenerator::with_options(false, 5, false)
        .generate_report(&report, OutputFormat::Json)
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["opportunities"].as_array().unwrap().len(), 3);
    assert_eq!(value["metadata"]["total_postings"], 3);
    assert_eq!(
        value["opportunities"][0]["posting"]["title"],
        "Junior Python Developer"
    );
}
