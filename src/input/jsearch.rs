//! JSearch (RapidAPI) adapter

use crate::config::SearchConfig;
use crate::error::{JobScoutError, Result};
use crate::input::posting::{clean_markup, Posting};
use crate::input::sources::PostingSource;
use anyhow::Context;
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_HOST: &str = "jsearch.p.rapidapi.com";

pub struct JSearchSource {
    client: Client,
    host: String,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<JSearchJob>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JSearchJob {
    job_title: Option<String>,
    employer_name: Option<String>,
    job_city: Option<String>,
    job_state: Option<String>,
    job_description: Option<String>,
    job_apply_link: Option<String>,
    job_salary: Option<Value>,
    job_posted_at_datetime_utc: Option<String>,
}

impl JSearchSource {
    pub fn new(api_key: impl Into<String>, search: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(search.timeout_secs))
            .build()
            .map_err(|e| JobScoutError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            host: DEFAULT_HOST.to_string(),
            base_url: format!("https://{}", DEFAULT_HOST),
            api_key: api_key.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request(&self, location: &str, query: &str) -> anyhow::Result<Vec<Posting>> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let search_text = format!("{} in {}", query, location);

        let response = self
            .client
            .get(&url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
            .query(&[
                ("query", search_text.as_str()),
                ("page", "1"),
                ("num_pages", "1"),
                ("date_posted", "week"),
            ])
            .send()
            .context("Failed to send request to JSearch")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("JSearch returned status {}", status);
        }

        let body: SearchResponse = response
            .json()
            .context("Failed to parse JSearch response")?;

        debug!("JSearch returned {} results", body.data.len());
        Ok(body.data.into_iter().map(|job| self.normalize(job)).collect())
    }

    fn normalize(&self, job: JSearchJob) -> Posting {
        let location = format!(
            "{}, {}",
            job.job_city.unwrap_or_default(),
            job.job_state.unwrap_or_default()
        );

        Posting {
            title: job.job_title.unwrap_or_default(),
            company: job.employer_name.unwrap_or_default(),
            location,
            description: clean_markup(&job.job_description.unwrap_or_default()),
            url: job.job_apply_link.unwrap_or_default(),
            salary: format_salary(job.job_salary),
            posted_date: job.job_posted_at_datetime_utc.unwrap_or_default(),
            source: self.name().to_string(),
        }
    }
}

fn format_salary(salary: Option<Value>) -> String {
    match salary {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => "Not specified".to_string(),
    }
}

impl PostingSource for JSearchSource {
    fn name(&self) -> &str {
        "JSearch"
    }

    fn fetch(&self, location: &str, query: &str) -> Result<Vec<Posting>> {
        self.request(location, query)
            .map_err(|e| JobScoutError::SourceUnavailable {
                source_name: self.name().to_string(),
                message: format!("{:#}", e),
            })
    }
}
