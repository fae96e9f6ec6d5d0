//! Source manager: fan a search out to every configured posting source

use crate::config::Config;
use crate::error::Result;
use crate::input::adzuna::AdzunaSource;
use crate::input::jsearch::JSearchSource;
use crate::input::posting::Posting;
use crate::input::sources::{JsonFileSource, PostingSource};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Postings gathered for one search, with the sources that contributed.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub postings: Vec<Posting>,
    pub sources_used: Vec<String>,
    pub failed_sources: Vec<String>,
}

pub struct SourceManager {
    sources: Vec<Box<dyn PostingSource>>,
}

impl Default for SourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceManager {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl PostingSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Build the provider set from configuration. A postings file replaces the
    /// network providers entirely; providers without credentials are skipped.
    pub fn from_config(config: &Config, postings_file: Option<PathBuf>) -> Result<Self> {
        let mut manager = Self::new();

        if let Some(path) = postings_file {
            return Ok(manager.with_source(JsonFileSource::new(path)));
        }

        let creds = &config.credentials;
        if creds.has_source_keys() {
            manager = manager.with_source(AdzunaSource::new(creds, &config.search)?);
        } else {
            info!("Adzuna credentials not configured, skipping");
        }

        match creds.rapidapi_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => {
                manager = manager.with_source(JSearchSource::new(key, &config.search)?);
            }
            _ => info!("RapidAPI key not configured, skipping JSearch"),
        }

        Ok(manager)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Concatenate every source's postings in registration order. A failing
    /// source is logged and contributes nothing.
    pub fn fetch_all(&self, location: &str, query: &str) -> FetchOutcome {
        debug!("Searching for jobs in {}...", location);
        let mut outcome = FetchOutcome::default();

        for source in &self.sources {
            match source.fetch(location, query) {
                Ok(postings) => {
                    debug!("{} returned {} postings", source.name(), postings.len());
                    outcome.sources_used.push(source.name().to_string());
                    outcome.postings.extend(postings);
                }
                Err(e) => {
                    warn!("{}", e);
                    outcome.failed_sources.push(source.name().to_string());
                }
            }
        }

        debug!("Found {} opportunities", outcome.postings.len());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JobScoutError;
    use crate::input::sources::StaticSource;

    struct BrokenSource;

    impl PostingSource for BrokenSource {
        fn name(&self) -> &str {
            "Broken"
        }

        fn fetch(&self, _location: &str, _query: &str) -> Result<Vec<Posting>> {
            Err(JobScoutError::SourceUnavailable {
                source_name: "Broken".to_string(),
                message: "timed out".to_string(),
            })
        }
    }

    #[test]
    fn test_failing_source_contributes_nothing() {
        let manager = SourceManager::new()
            .with_source(StaticSource::new("First", vec![Posting::new("A", "one")]))
            .with_source(BrokenSource)
            .with_source(StaticSource::new("Second", vec![Posting::new("B", "two")]));

        let outcome = manager.fetch_all("Pune", "python");

        let titles: Vec<&str> = outcome.postings.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(outcome.sources_used, vec!["First", "Second"]);
        assert_eq!(outcome.failed_sources, vec!["Broken"]);
    }

    #[test]
    fn test_no_sources_is_empty() {
        let outcome = SourceManager::new().fetch_all("Pune", "python");
        assert!(outcome.postings.is_empty());
    }

    #[test]
    fn test_from_config_without_credentials() {
        let manager = SourceManager::from_config(&Config::default(), None).unwrap();
        assert_eq!(manager.source_count(), 0);
    }

    #[test]
    fn test_from_config_with_file() {
        let manager =
            SourceManager::from_config(&Config::default(), Some(PathBuf::from("jobs.json")))
                .unwrap();
        assert_eq!(manager.source_count(), 1);
    }
}
