//! Skill-gap analysis: frequent terms in top postings the user has not declared

use crate::config::AnalysisConfig;
use crate::processing::ranking::Opportunity;
use crate::processing::relevance::SkillProfile;
use crate::processing::text_processor::{title_case, TextProcessor};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedSkill {
    pub term: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "skills", rename_all = "snake_case")]
pub enum UpskillingOutcome {
    /// Terms worth learning, most frequent first.
    Suggestions(Vec<SuggestedSkill>),
    /// Nothing frequent is missing from the declared skills.
    AlreadyAligned,
    /// No opportunities to learn from.
    NoOpportunities,
}

impl UpskillingOutcome {
    pub fn suggestions(&self) -> &[SuggestedSkill] {
        match self {
            UpskillingOutcome::Suggestions(skills) => skills,
            _ => &[],
        }
    }
}

/// Which frequent terms survive as "missing" keywords.
#[derive(Debug, Clone, Copy)]
pub struct KeywordFilter {
    pub window: usize,
    pub min_frequency: usize,
    pub min_length: usize,
    pub limit: usize,
}

pub struct SkillGapAnalyzer {
    processor: TextProcessor,
    top_k: usize,
    filter: KeywordFilter,
}

impl Default for SkillGapAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl SkillGapAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            processor: TextProcessor::new(),
            top_k: config.gap_top_k,
            filter: KeywordFilter {
                window: config.frequent_window,
                min_frequency: config.min_frequency,
                min_length: 3,
                limit: config.max_suggestions,
            },
        }
    }

    pub fn filter(&self) -> KeywordFilter {
        self.filter
    }

    /// Suggest skills from the top-ranked opportunities.
    pub fn analyze(&self, opportunities: &[Opportunity], profile: &SkillProfile) -> UpskillingOutcome {
        if opportunities.is_empty() {
            return UpskillingOutcome::NoOpportunities;
        }

        let texts: Vec<String> = opportunities
            .iter()
            .take(self.top_k)
            .map(|opp| opp.posting.combined_text())
            .collect();

        let suggestions = self.missing_keywords(&texts, profile, self.filter);
        debug!("Skill gap analysis produced {} suggestions", suggestions.len());

        if suggestions.is_empty() {
            UpskillingOutcome::AlreadyAligned
        } else {
            UpskillingOutcome::Suggestions(suggestions)
        }
    }

    /// Token counts over all `texts`, most frequent first. Ties keep the order
    /// in which tokens were first seen.
    pub fn keyword_counts<S: AsRef<str>>(&self, texts: &[S]) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut seen = 0usize;

        for text in texts {
            for token in self.processor.alphabetic_tokens(text.as_ref()) {
                let entry = counts.entry(token).or_insert_with(|| {
                    seen += 1;
                    (0, seen)
                });
                entry.0 += 1;
            }
        }

        let mut ordered: Vec<(String, (usize, usize))> = counts.into_iter().collect();
        ordered.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
        ordered
            .into_iter()
            .map(|(token, (count, _))| (token, count))
            .collect()
    }

    /// Frequent tokens from `texts` that are not declared skills or noise.
    pub fn missing_keywords<S: AsRef<str>>(
        &self,
        texts: &[S],
        profile: &SkillProfile,
        filter: KeywordFilter,
    ) -> Vec<SuggestedSkill> {
        self.keyword_counts(texts)
            .into_iter()
            .take(filter.window)
            .filter(|(token, count)| {
                !profile.contains(token)
                    && token.len() >= filter.min_length
                    && !self.processor.is_posting_noise(token)
                    && *count >= filter.min_frequency
            })
            .take(filter.limit)
            .map(|(token, frequency)| SuggestedSkill {
                term: title_case(&token),
                frequency,
            })
            .collect()
    }
}
