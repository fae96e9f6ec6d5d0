//! Ranking engine: vector similarity blended with literal skill overlap

use crate::config::{ScoringConfig, VectorizerConfig};
use crate::error::Result;
use crate::input::Posting;
use crate::processing::relevance::{RelevanceScorer, SkillProfile};
use crate::processing::vectorizer::{TfidfVectorizer, VectorSpace};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// A posting with its scores for the current search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    /// Position of the posting in the fetched list.
    pub index: usize,
    pub posting: Posting,
    /// Combined score in [0, 1].
    pub match_score: f32,
    /// Percentage in [0, 100] of declared skills found in the posting.
    pub skill_relevance: f32,
}

/// Postings of one search together with the vector space fitted on them.
///
/// Built once per posting set and never mutated; a new posting set needs a
/// new session.
pub struct SearchSession {
    postings: Vec<Posting>,
    space: Option<VectorSpace>,
}

impl SearchSession {
    pub fn new(postings: Vec<Posting>, config: &VectorizerConfig) -> Result<Self> {
        if postings.is_empty() {
            return Ok(Self {
                postings,
                space: None,
            });
        }

        let documents: Vec<String> = postings.iter().map(Posting::combined_text).collect();
        let space = TfidfVectorizer::new(config.max_features).fit_transform(&documents)?;
        debug!("Job vectors prepared for {} postings", postings.len());

        Ok(Self {
            postings,
            space: Some(space),
        })
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn vector_space(&self) -> Option<&VectorSpace> {
        self.space.as_ref()
    }

    /// Rank every posting for `profile` in `location`, best first. Postings
    /// with equal scores keep their fetch order.
    pub fn rank(
        &self,
        profile: &SkillProfile,
        location: &str,
        weights: &ScoringConfig,
    ) -> Result<Vec<Opportunity>> {
        let Some(space) = &self.space else {
            return Ok(Vec::new());
        };

        let query = format!("{} {}", profile.raw(), location);
        let query_vector = space.transform(&query);
        let similarities = space.similarities(&query_vector);
        let scorer = RelevanceScorer::new(profile)?;

        let mut ranked: Vec<Opportunity> = self
            .postings
            .iter()
            .enumerate()
            .map(|(index, posting)| {
                let skill_relevance = scorer.score(&posting.combined_text());
                Opportunity {
                    index,
                    posting: posting.clone(),
                    match_score: combined_score(similarities[index], skill_relevance, weights),
                    skill_relevance,
                }
            })
            .collect();

        // sort_by is stable
        ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        Ok(ranked)
    }
}

/// `similarity_weight * cosine + relevance_weight * relevance_percent / 100`.
pub fn combined_score(similarity: f32, relevance_percent: f32, weights: &ScoringConfig) -> f32 {
    let score =
        weights.similarity_weight * similarity + weights.relevance_weight * (relevance_percent / 100.0);
    score.clamp(0.0, 1.0)
}

/// Entry point for a whole search: builds the session and ranks it.
pub struct RankingEngine {
    vectorizer: VectorizerConfig,
    scoring: ScoringConfig,
}

impl RankingEngine {
    pub fn new(vectorizer: VectorizerConfig, scoring: ScoringConfig) -> Self {
        Self {
            vectorizer,
            scoring,
        }
    }

    pub fn session(&self, postings: Vec<Posting>) -> Result<SearchSession> {
        SearchSession::new(postings, &self.vectorizer)
    }

    pub fn rank(
        &self,
        session: &SearchSession,
        profile: &SkillProfile,
        location: &str,
    ) -> Result<Vec<Opportunity>> {
        info!(
            "Ranking {} postings for skills '{}' in {}",
            session.len(),
            profile.raw(),
            location
        );
        session.rank(profile, location, &self.scoring)
    }

    /// Fit, rank and return the ordered opportunities for one posting set.
    pub fn find_opportunities(
        &self,
        postings: Vec<Posting>,
        skills: &str,
        location: &str,
    ) -> Result<Vec<Opportunity>> {
        let session = self.session(postings)?;
        self.rank(&session, &SkillProfile::parse(skills), location)
    }
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(VectorizerConfig::default(), ScoringConfig::default())
    }
}
