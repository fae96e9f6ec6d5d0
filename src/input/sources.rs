//! Posting source trait and local sources

use crate::error::{JobScoutError, Result};
use crate::input::posting::Posting;
use log::debug;
use std::path::PathBuf;

/// Anything that can produce postings for a location and free-text query.
pub trait PostingSource {
    /// Provider tag, also written into each posting's `source` field.
    fn name(&self) -> &str;

    /// Fetch postings. Failures are reported as `SourceUnavailable` so the
    /// caller can treat them as zero results.
    fn fetch(&self, location: &str, query: &str) -> Result<Vec<Posting>>;
}

impl<S: PostingSource + ?Sized> PostingSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, location: &str, query: &str) -> Result<Vec<Posting>> {
        (**self).fetch(location, query)
    }
}

/// Postings loaded from a JSON array on disk.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Vec<Posting>> {
        let content = std::fs::read_to_string(&self.path)?;
        let postings: Vec<Posting> = serde_json::from_str(&content)?;
        Ok(postings)
    }
}

impl PostingSource for JsonFileSource {
    fn name(&self) -> &str {
        "File"
    }

    /// Every posting in the file is returned; the query does not filter.
    fn fetch(&self, _location: &str, _query: &str) -> Result<Vec<Posting>> {
        debug!("Reading postings from {}", self.path.display());
        self.read()
            .map(|postings| {
                postings
                    .into_iter()
                    .map(|mut posting| {
                        if posting.source.is_empty() {
                            posting.source = self.name().to_string();
                        }
                        posting
                    })
                    .collect()
            })
            .map_err(|e| JobScoutError::SourceUnavailable {
                source_name: self.name().to_string(),
                message: e.to_string(),
            })
    }
}

/// Fixed in-memory postings, handy for demos and tests.
pub struct StaticSource {
    name: String,
    postings: Vec<Posting>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, postings: Vec<Posting>) -> Self {
        Self {
            name: name.into(),
            postings,
        }
    }
}

impl PostingSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, _location: &str, _query: &str) -> Result<Vec<Posting>> {
        Ok(self.postings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_json_file_source_tags_postings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title": "Python Developer", "description": "Django"}},
                {{"title": "Analyst", "source": "Manual"}}]"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        let postings = source.fetch("Pune", "python").unwrap();

        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].source, "File");
        assert_eq!(postings[1].source, "Manual");
    }

    #[test]
    fn test_json_file_source_missing_file() {
        let source = JsonFileSource::new("does/not/exist.json");
        let result = source.fetch("Pune", "python");

        assert!(matches!(
            result,
            Err(JobScoutError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_boxed_source_delegates() {
        let boxed: Box<dyn PostingSource> =
            Box::new(StaticSource::new("Static", vec![Posting::new("A", "b")]));
        assert_eq!(boxed.name(), "Static");
        assert_eq!(boxed.fetch("", "").unwrap().len(), 1);
    }
}
