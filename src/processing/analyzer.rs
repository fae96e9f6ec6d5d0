//! Search engine coordinating sources, ranking, gap analysis and advice

use crate::config::Config;
use crate::error::Result;
use crate::input::manager::{FetchOutcome, SourceManager};
use crate::llm::advisor::AdviceComposer;
use crate::llm::generator::GeminiClient;
use crate::output::report::{ReportMetadata, SearchQuery, SearchReport};
use crate::processing::ranking::RankingEngine;
use crate::processing::relevance::SkillProfile;
use crate::processing::skill_gap::SkillGapAnalyzer;
use log::{info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// What the user asked for in one search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub skills: String,
    pub location: String,
    pub experience_level: String,
}

impl SearchRequest {
    pub fn new(
        skills: impl Into<String>,
        location: impl Into<String>,
        experience_level: impl Into<String>,
    ) -> Self {
        Self {
            skills: skills.into(),
            location: location.into(),
            experience_level: experience_level.into(),
        }
    }

    fn query(&self) -> SearchQuery {
        SearchQuery {
            skills: self.skills.clone(),
            location: self.location.clone(),
            experience_level: self.experience_level.clone(),
        }
    }
}

/// Main engine that coordinates all search components
pub struct AnalysisEngine {
    sources: SourceManager,
    ranking: RankingEngine,
    gap_analyzer: SkillGapAnalyzer,
    advisor: AdviceComposer,
}

impl AnalysisEngine {
    /// Engine over `sources` with template-only advice.
    pub fn new(sources: SourceManager, config: &Config) -> Self {
        Self {
            sources,
            ranking: RankingEngine::new(config.vectorizer.clone(), config.scoring),
            gap_analyzer: SkillGapAnalyzer::new(&config.analysis),
            advisor: AdviceComposer::new(&config.analysis),
        }
    }

    /// Wire up sources and, when a provider key is present and `use_llm` is
    /// set, the Gemini client.
    pub fn from_config(config: &Config, postings_file: Option<PathBuf>, use_llm: bool) -> Result<Self> {
        let sources = SourceManager::from_config(config, postings_file)?;
        let mut advisor = AdviceComposer::new(&config.analysis);

        if use_llm && config.credentials.has_provider_key() {
            let client = GeminiClient::new(config.credentials.provider_api_key.as_str(), &config.advice)?;
            advisor = advisor.with_generator(Box::new(client));
        } else if use_llm {
            info!("No provider API key configured, advice will use the local template");
        }

        Ok(Self::new(sources, config).with_advisor(advisor))
    }

    pub fn with_advisor(mut self, advisor: AdviceComposer) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.source_count()
    }

    pub fn has_generator(&self) -> bool {
        self.advisor.has_generator()
    }

    pub fn fetch(&self, request: &SearchRequest) -> FetchOutcome {
        self.sources.fetch_all(&request.location, &request.skills)
    }

    /// Rank fetched postings and mine upskilling suggestions. Advice is left
    /// empty; see [`AnalysisEngine::advise`].
    pub fn analyze(&self, request: &SearchRequest, fetched: FetchOutcome) -> Result<SearchReport> {
        let start = Instant::now();
        let profile = SkillProfile::parse(&request.skills);
        let total_postings = fetched.postings.len();

        if total_postings == 0 {
            warn!("No opportunities found in {}", request.location);
        }

        let session = self.ranking.session(fetched.postings)?;
        let opportunities = self.ranking.rank(&session, &profile, &request.location)?;
        let upskilling = self.gap_analyzer.analyze(&opportunities, &profile);

        info!(
            "Ranked {} opportunities in {}ms",
            opportunities.len(),
            start.elapsed().as_millis()
        );

        Ok(SearchReport {
            query: request.query(),
            opportunities,
            upskilling,
            advice: None,
            metadata: ReportMetadata::new(total_postings, fetched.sources_used, fetched.failed_sources),
        })
    }

    /// Attach career advice to a finished report.
    pub fn advise(&self, report: &mut SearchReport) {
        let profile = SkillProfile::parse(&report.query.skills);
        let advice = self
            .advisor
            .compose(&report.opportunities, &profile, &report.query.experience_level);
        report.advice = Some(advice);
    }

    /// Fetch, rank and analyze in one go, optionally with advice.
    pub fn search(&self, request: &SearchRequest, with_advice: bool) -> Result<SearchReport> {
        let fetched = self.fetch(request);
        let mut report = self.analyze(request, fetched)?;
        if with_advice {
            self.advise(&mut report);
        }
        Ok(report)
    }
}
