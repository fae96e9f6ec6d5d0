//! Job scout: rank local job postings against your skills

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use job_scout::cli::{self, Cli, Commands, ConfigAction};
use job_scout::config::{parse_output_format, Config, OutputFormat};
use job_scout::error::{JobScoutError, Result};
use job_scout::output::formatter::{save_report_to_file, ReportGenerator};
use job_scout::output::report::SearchReport;
use job_scout::processing::{AnalysisEngine, SearchRequest};
use log::{error, log_enabled, Level};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path) {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

/// Load `path` (created with defaults when missing), then overlay
/// credentials from the environment.
fn load_config(path: &Path) -> Result<Config> {
    let mut config = Config::load_or_init(path)?;
    config.apply_env_overrides();
    Ok(config)
}

fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Search {
            skills,
            location,
            experience,
            postings,
            advice,
            no_llm,
            output,
            limit,
            save,
        } => {
            cli::validate_skills(&skills).map_err(JobScoutError::InvalidInput)?;
            if location.trim().is_empty() {
                return Err(JobScoutError::InvalidInput("Location must not be empty".to_string()));
            }

            let output_format = match output {
                Some(format) => parse_output_format(&format).map_err(JobScoutError::InvalidInput)?,
                None => config.output.format,
            };

            let engine = AnalysisEngine::from_config(&config, postings, !no_llm)?;
            let request = SearchRequest::new(skills.trim(), location.trim(), experience.trim());
            let report = run_search(&engine, &request, advice)?;

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                limit.unwrap_or(config.output.display_limit),
                true,
            );
            let rendered = generator.generate_report(&report, output_format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&rendered, &path)?;
                    println!("💾 Report saved to {}", path.display());
                }
                None => print!("{}", rendered),
            }
        }

        Commands::Interactive { postings, no_llm } => {
            let engine = AnalysisEngine::from_config(&config, postings, !no_llm)?;
            let generator = ReportGenerator::with_options(
                config.output.color_output,
                config.output.display_limit,
                true,
            );
            interactive_loop(&engine, &generator)?;
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => show_config(&config, config_path),

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => println!("{}", config_path.display()),
        },
    }

    Ok(())
}

/// Spinner on stderr; hidden when debug logs are enabled so the two never share a line.
fn spinner(message: &str) -> ProgressBar {
    if log_enabled!(Level::Debug) {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn run_search(engine: &AnalysisEngine, request: &SearchRequest, with_advice: bool) -> Result<SearchReport> {
    let bar = spinner(&format!("Searching for jobs in {}...", request.location));
    let fetched = engine.fetch(request);
    bar.finish_and_clear();

    let mut report = engine.analyze(request, fetched)?;

    if with_advice {
        let bar = spinner("Generating recommendations...");
        engine.advise(&mut report);
        bar.finish_and_clear();
    }

    Ok(report)
}

/// Print `label` and read one trimmed line; `None` on end of input.
fn prompt(input: &mut impl BufRead, label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn interactive_loop(engine: &AnalysisEngine, generator: &ReportGenerator) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("🔎 JOB SCOUT - LOCAL OPPORTUNITY CONNECTOR");
    println!("{}", "=".repeat(50));

    loop {
        println!("\nEnter your details:");
        let Some(skills) = prompt(&mut input, "Your skills (comma-separated): ")? else {
            break;
        };
        let Some(location) = prompt(&mut input, "Your location: ")? else {
            break;
        };
        let Some(experience) = prompt(&mut input, "Experience level (entry/mid/senior) [entry]: ")? else {
            break;
        };
        let experience = if experience.is_empty() { "entry".to_string() } else { experience };

        if cli::validate_skills(&skills).is_err() || location.is_empty() {
            println!("Please enter both skills and location!");
            continue;
        }

        let request = SearchRequest::new(skills, location, experience);
        let mut report = run_search(engine, &request, false)?;
        print!("{}", generator.generate_report(&report, OutputFormat::Console)?);

        if report.has_opportunities() {
            println!("\nWould you like personalized recommendations for resume optimization and career strategy?");
            let answer = prompt(&mut input, "Get recommendations? (y/n): ")?.unwrap_or_default();
            if answer.eq_ignore_ascii_case("y") {
                let bar = spinner("Generating recommendations...");
                engine.advise(&mut report);
                bar.finish_and_clear();
                if let Some(advice) = &report.advice {
                    print!("\n{}", generator.console().format_advice(advice));
                }
            }
        }

        let again = prompt(&mut input, "\nSearch again? (y/n): ")?.unwrap_or_default();
        if !again.eq_ignore_ascii_case("y") {
            break;
        }
    }

    println!("Thank you for using job scout!");
    Ok(())
}

fn mask(secret: &str) -> &str {
    if secret.trim().is_empty() {
        "(not set)"
    } else {
        "********"
    }
}

fn show_config(config: &Config, path: &Path) {
    println!("⚙️  Current Configuration ({})\n", path.display());

    let creds = &config.credentials;
    println!("Credentials:");
    println!("  Provider API key: {}", mask(&creds.provider_api_key));
    println!("  Adzuna app id: {}", mask(&creds.source_app_id));
    println!("  Adzuna app key: {}", mask(&creds.source_app_key));
    println!("  RapidAPI key: {}", mask(creds.rapidapi_key.as_deref().unwrap_or("")));

    println!("\nSearch:");
    println!("  Country: {}", config.search.country);
    println!("  Results per page: {}", config.search.results_per_page);
    println!("  Max days old: {}", config.search.max_days_old);
    println!("  Timeout: {}s", config.search.timeout_secs);

    println!("\nScoring Weights:");
    println!("  Similarity: {:.1}%", config.scoring.similarity_weight * 100.0);
    println!("  Skill relevance: {:.1}%", config.scoring.relevance_weight * 100.0);
    println!("  Max features: {}", config.vectorizer.max_features);

    println!("\nAdvice models: {}", config.advice.candidate_models.join(", "));
    println!("Output: {:?}, showing top {}", config.output.format, config.output.display_limit);
}
