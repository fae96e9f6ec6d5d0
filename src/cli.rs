//! CLI interface for job scout

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "job-scout")]
#[command(about = "Rank local job postings against your skills")]
#[command(long_about = "Fetch job postings, rank them against a skill profile using TF-IDF similarity and skill overlap, suggest skills to learn, and compose career advice")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search and rank postings for a skill profile
    Search {
        /// Comma-separated skills, e.g. "python, sql"
        #[arg(short, long)]
        skills: String,

        /// Location to search in
        #[arg(short, long)]
        location: String,

        /// Experience level (entry, mid, senior)
        #[arg(short, long, default_value = "entry")]
        experience: String,

        /// Read postings from a JSON file instead of the job-search providers
        #[arg(short, long)]
        postings: Option<PathBuf>,

        /// Compose career advice for the top opportunities
        #[arg(short, long)]
        advice: bool,

        /// Never call the text-generation service; advice uses the local template
        #[arg(long)]
        no_llm: bool,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,

        /// Number of opportunities to display
        #[arg(long)]
        limit: Option<usize>,

        /// Save output to file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Prompt for skills and location in a loop
    Interactive {
        /// Read postings from a JSON file instead of the job-search providers
        #[arg(short, long)]
        postings: Option<PathBuf>,

        /// Never call the text-generation service
        #[arg(long)]
        no_llm: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Reject a skills argument with no non-empty entries.
pub fn validate_skills(skills: &str) -> Result<(), String> {
    if skills.split(',').any(|s| !s.trim().is_empty()) {
        Ok(())
    } else {
        Err("Please enter at least one skill".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_defaults() {
        let cli = Cli::parse_from(["job-scout", "search", "-s", "python, sql", "-l", "Pune"]);
        match cli.command {
            Commands::Search {
                skills,
                location,
                experience,
                advice,
                no_llm,
                output,
                ..
            } => {
                assert_eq!(skills, "python, sql");
                assert_eq!(location, "Pune");
                assert_eq!(experience, "entry");
                assert!(!advice);
                assert!(!no_llm);
                assert!(output.is_none());
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_validate_skills() {
        assert!(validate_skills("python").is_ok());
        assert!(validate_skills(" , ").is_err());
        assert!(validate_skills("").is_err());
    }
}
