//! Literal skill-overlap scoring

use crate::error::{JobScoutError, Result};
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User-declared skills parsed from a comma-separated string.
///
/// Skills are lower-cased and trimmed; empty entries are dropped. Duplicates
/// are kept and count twice in the relevance denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    raw: String,
    skills: Vec<String>,
}

impl SkillProfile {
    pub fn parse(raw: &str) -> Self {
        let skills = raw
            .split(',')
            .map(|skill| skill.trim().to_lowercase())
            .filter(|skill| !skill.is_empty())
            .collect();

        Self {
            raw: raw.trim().to_string(),
            skills,
        }
    }

    /// The input as the user typed it, for queries and prompts.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Case-insensitive membership test against whole declared skills.
    pub fn contains(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.skills.iter().any(|skill| *skill == term)
    }
}

/// Scores documents by the share of declared skills appearing in them as
/// literal substrings. "go" therefore matches "going".
pub struct RelevanceScorer {
    matcher: Option<AhoCorasick>,
    skill_patterns: Vec<usize>,
    pattern_count: usize,
}

impl RelevanceScorer {
    pub fn new(profile: &SkillProfile) -> Result<Self> {
        let mut pattern_ids: HashMap<&str, usize> = HashMap::new();
        let mut patterns: Vec<&str> = Vec::new();
        let skill_patterns = profile
            .skills()
            .iter()
            .map(|skill| {
                *pattern_ids.entry(skill.as_str()).or_insert_with(|| {
                    patterns.push(skill.as_str());
                    patterns.len() - 1
                })
            })
            .collect();

        let matcher = if patterns.is_empty() {
            None
        } else {
            Some(AhoCorasick::new(&patterns).map_err(|e| {
                JobScoutError::TextProcessing(format!("Failed to build skill matcher: {}", e))
            })?)
        };

        Ok(Self {
            matcher,
            skill_patterns,
            pattern_count: patterns.len(),
        })
    }

    /// Percentage in [0, 100] of declared skills found in `text`.
    pub fn score(&self, text: &str) -> f32 {
        let Some(matcher) = &self.matcher else {
            return 0.0;
        };

        let haystack = text.to_lowercase();
        let mut found = vec![false; self.pattern_count];
        for mat in matcher.find_overlapping_iter(&haystack) {
            found[mat.pattern().as_usize()] = true;
        }

        let matches = self.skill_patterns.iter().filter(|&&id| found[id]).count();
        matches as f32 / self.skill_patterns.len() as f32 * 100.0
    }
}

/// One-shot relevance of a comma-separated skill string against `text`.
pub fn skill_relevance(skills: &str, text: &str) -> Result<f32> {
    let profile = SkillProfile::parse(skills);
    Ok(RelevanceScorer::new(&profile)?.score(text))
}
