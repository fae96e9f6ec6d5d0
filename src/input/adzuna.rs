//! Adzuna job search adapter

use crate::config::{Credentials, SearchConfig};
use crate::error::{JobScoutError, Result};
use crate::input::posting::{clean_markup, Posting};
use crate::input::sources::PostingSource;
use anyhow::Context;
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.adzuna.com";

pub struct AdzunaSource {
    client: Client,
    base_url: String,
    app_id: String,
    app_key: String,
    country: String,
    results_per_page: usize,
    max_days_old: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<AdzunaJob>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AdzunaJob {
    title: String,
    company: DisplayName,
    location: DisplayName,
    description: String,
    redirect_url: String,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    created: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DisplayName {
    display_name: String,
}

impl AdzunaSource {
    pub fn new(credentials: &Credentials, search: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(search.timeout_secs))
            .build()
            .map_err(|e| JobScoutError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            app_id: credentials.source_app_id.clone(),
            app_key: credentials.source_app_key.clone(),
            country: search.country.clone(),
            results_per_page: search.results_per_page,
            max_days_old: search.max_days_old,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request(&self, location: &str, query: &str) -> anyhow::Result<Vec<Posting>> {
        let url = format!(
            "{}/v1/api/jobs/{}/search/1",
            self.base_url.trim_end_matches('/'),
            self.country
        );
        let results_per_page = self.results_per_page.to_string();
        let max_days_old = self.max_days_old.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("app_id", self.app_id.as_str()),
                ("app_key", self.app_key.as_str()),
                ("results_per_page", results_per_page.as_str()),
                ("what", query),
                ("where", location),
                ("sort_by", "date"),
                ("max_days_old", max_days_old.as_str()),
            ])
            .send()
            .context("Failed to send request to Adzuna")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Adzuna returned status {}", status);
        }

        let body: SearchResponse = response
            .json()
            .context("Failed to parse Adzuna response")?;

        debug!("Adzuna returned {} results", body.results.len());
        Ok(body.results.into_iter().map(|job| self.normalize(job)).collect())
    }

    fn normalize(&self, job: AdzunaJob) -> Posting {
        Posting {
            title: job.title,
            company: job.company.display_name,
            location: job.location.display_name,
            description: clean_markup(&job.description),
            url: job.redirect_url,
            salary: format_salary(job.salary_min, job.salary_max),
            posted_date: job.created,
            source: self.name().to_string(),
        }
    }
}

/// Adzuna only reports a range when a minimum is present.
fn format_salary(min: Option<f64>, max: Option<f64>) -> String {
    match min {
        Some(min) if min > 0.0 => format!("₹{:.0}-{:.0}", min, max.unwrap_or(0.0)),
        _ => "Not specified".to_string(),
    }
}

impl PostingSource for AdzunaSource {
    fn name(&self) -> &str {
        "Adzuna"
    }

    fn fetch(&self, location: &str, query: &str) -> Result<Vec<Posting>> {
        self.request(location, query)
            .map_err(|e| JobScoutError::SourceUnavailable {
                source_name: self.name().to_string(),
                message: format!("{:#}", e),
            })
    }
}
