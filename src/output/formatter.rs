//! Output formatters: plain/coloured console text and JSON

use crate::config::OutputFormat;
use crate::error::Result;
use crate::llm::advisor::{Advice, AdviceOrigin};
use crate::output::report::SearchReport;
use crate::processing::ranking::Opportunity;
use crate::processing::skill_gap::UpskillingOutcome;
use crate::processing::text_processor::truncate_graphemes;
use colored::{Color, Colorize};
use std::path::Path;

/// Characters of each description shown on the console.
pub const DISPLAY_DESCRIPTION_CHARS: usize = 200;

const RULE: &str = "----------------------------------------";

/// Trait for formatting search reports
pub trait OutputFormatter {
    fn format_report(&self, report: &SearchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    display_limit: usize,
}

pub struct JsonFormatter {
    pretty: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, display_limit: usize) -> Self {
        Self {
            use_colors,
            display_limit,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("{}\n", title.color(Color::Blue).bold())
        } else {
            format!("{}\n", title)
        }
    }

    /// The block for one opportunity; `rank` is 1-based.
    pub fn format_opportunity(&self, rank: usize, opp: &Opportunity) -> String {
        let job = &opp.posting;
        let mut out = String::new();

        out.push_str(&self.format_header(&format!("OPPORTUNITY #{}", rank)));
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!("Job Title: {}\n", job.title));
        out.push_str(&format!("Company: {}\n", job.company));
        out.push_str(&format!("Location: {}\n", job.location));
        out.push_str(&format!("Salary: {}\n", job.salary));
        out.push_str(&format!("Posted: {}\n", job.posted_date));
        out.push_str(&format!("Source: {}\n", job.source));
        out.push_str(&format!(
            "Match Score: {}\n",
            self.colorize(&format!("{:.1}%", opp.match_score * 100.0), Color::Green)
        ));
        out.push_str(&format!("Skill Relevance: {:.1}%\n", opp.skill_relevance));
        out.push_str(&format!(
            "Description: {}...\n",
            truncate_graphemes(&job.description, DISPLAY_DESCRIPTION_CHARS)
        ));
        out.push_str(&format!("Apply: {}\n", job.url));
        out
    }

    pub fn format_opportunities(&self, opportunities: &[Opportunity]) -> String {
        if opportunities.is_empty() {
            return "No matching opportunities found.\n".to_string();
        }

        let mut out = format!("Found {} matching opportunities!\n\n", opportunities.len());
        for (i, opp) in opportunities.iter().take(self.display_limit).enumerate() {
            out.push_str(&self.format_opportunity(i + 1, opp));
            out.push('\n');
        }
        out
    }

    pub fn format_upskilling(&self, outcome: &UpskillingOutcome) -> String {
        let mut out = self.format_header("UPSKILLING SUGGESTIONS:");
        match outcome {
            UpskillingOutcome::Suggestions(skills) => {
                out.push_str("Based on current job market demands, consider learning:\n");
                for skill in skills {
                    out.push_str(&format!("- {}\n", self.colorize(&skill.term, Color::Yellow)));
                }
                out.push_str("\nRecommended learning resources:\n");
                out.push_str("- Online courses (Coursera, Udemy, edX)\n");
                out.push_str("- Local training centers\n");
                out.push_str("- YouTube tutorials\n");
                out.push_str("- Professional certifications\n");
            }
            UpskillingOutcome::AlreadyAligned => {
                out.push_str("Your skills align well with current opportunities!\n");
                out.push_str("Consider deepening your expertise in your existing skills.\n");
            }
            UpskillingOutcome::NoOpportunities => {
                out.push_str("No opportunities to analyze yet.\n");
            }
        }
        out
    }

    pub fn format_advice(&self, advice: &Advice) -> String {
        let banner = "=".repeat(60);
        let mut out = format!("{}\n", banner);
        out.push_str(&self.format_header("CAREER COACH RECOMMENDATIONS:"));
        match &advice.origin {
            AdviceOrigin::Generated { model } => {
                out.push_str(&format!("(generated by {})\n", model));
            }
            AdviceOrigin::Fallback { .. } => {
                out.push_str("(generated locally from job description keywords)\n");
            }
            AdviceOrigin::NoOpportunities => {}
        }
        out.push_str(&format!("{}\n", banner));
        out.push_str(advice.text.trim_end());
        out.push('\n');
        out.push_str(&format!("{}\n", banner));
        out
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &SearchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("Location: {}\n", report.query.location));
        output.push_str(&format!("Skills: {}\n", report.query.skills));
        output.push_str(&format!("Experience: {}\n", report.query.experience_level));
        output.push_str(&format!("{}\n\n", "-".repeat(50)));

        output.push_str(&self.format_opportunities(&report.opportunities));

        if report.has_opportunities() {
            output.push('\n');
            output.push_str(&self.format_upskilling(&report.upskilling));
        }

        if let Some(advice) = &report.advice {
            output.push('\n');
            output.push_str(&self.format_advice(advice));
        }

        if !report.metadata.failed_sources.is_empty() {
            output.push_str(&format!(
                "\n{}\n",
                self.colorize(
                    &format!("Unavailable sources: {}", report.metadata.failed_sources.join(", ")),
                    Color::Red
                )
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &SearchReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, 5, true)
    }

    pub fn with_options(use_colors: bool, display_limit: usize, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, display_limit),
            json_formatter: JsonFormatter::new(pretty_json),
        }
    }

    pub fn console(&self) -> &ConsoleFormatter {
        &self.console_formatter
    }

    pub fn generate_report(&self, report: &SearchReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}
