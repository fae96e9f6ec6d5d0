//! Normalized job posting shared by every source

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One job listing as normalized from a provider.
///
/// Postings have no stable key: within a search they are identified by their
/// position in the fetched list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Posting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub salary: String,
    pub posted_date: String,
    pub source: String,
}

impl Posting {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Title and description joined with a space; the text every scorer looks at.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// Strip markup that providers leave in descriptions and collapse whitespace.
pub fn clean_markup(raw: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let tag_re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

    let text = raw
        .replace("<br>", "\n")
        .replace("</p>", "\n\n")
        .replace("&nbsp;", " ");

    // decode entities only after tags are stripped
    let stripped = tag_re
        .replace_all(&text, " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_text() {
        let posting = Posting::new("Data Analyst", "SQL and Excel");
        assert_eq!(posting.combined_text(), "Data Analyst SQL and Excel");
    }

    #[test]
    fn test_missing_fields_deserialize_to_empty() {
        let posting: Posting = serde_json::from_str(r#"{"title": "Engineer"}"#).unwrap();
        assert_eq!(posting.title, "Engineer");
        assert!(posting.salary.is_empty());
        assert!(posting.url.is_empty());
    }

    #[test]
    fn test_clean_markup() {
        let cleaned = clean_markup("<p>Python &amp; SQL</p>\n\n<strong>Remote</strong>&nbsp;ok");
        assert_eq!(cleaned, "Python & SQL Remote ok");
    }
}
