//! Job scout library: rank job postings against a skill profile

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod llm;
pub mod output;

pub use error::{Result, JobScoutError};
pub use config::Config;
pub use processing::{AnalysisEngine, SearchRequest};
