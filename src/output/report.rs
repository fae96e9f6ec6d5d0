//! Search report handed to the formatters

use crate::error::JobScoutError;
use crate::llm::advisor::Advice;
use crate::processing::ranking::Opportunity;
use crate::processing::skill_gap::UpskillingOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything one search produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub query: SearchQuery,

    /// Ranked best first; empty when nothing was found.
    pub opportunities: Vec<Opportunity>,

    pub upskilling: UpskillingOutcome,

    /// Present only when advice was requested.
    pub advice: Option<Advice>,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub skills: String,
    pub location: String,
    pub experience_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub total_postings: usize,
    pub sources_used: Vec<String>,
    pub failed_sources: Vec<String>,

    /// Set when no source returned any postings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ReportMetadata {
    pub fn new(total_postings: usize, sources_used: Vec<String>, failed_sources: Vec<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            total_postings,
            sources_used,
            failed_sources,
            notice: (total_postings == 0).then(|| JobScoutError::EmptyResultSet.to_string()),
        }
    }
}

impl SearchReport {
    pub fn has_opportunities(&self) -> bool {
        !self.opportunities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fetch_sets_notice() {
        let empty = ReportMetadata::new(0, Vec::new(), vec!["Adzuna".to_string()]);
        assert_eq!(empty.notice.as_deref(), Some("No postings found"));

        let found = ReportMetadata::new(2, vec!["Adzuna".to_string()], Vec::new());
        assert!(found.notice.is_none());
        let json = serde_json::to_value(&found).unwrap();
        assert!(json.get("notice").is_none());
    }
}
