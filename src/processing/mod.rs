//! Matching and ranking engine

pub mod text_processor;
pub mod vectorizer;
pub mod relevance;
pub mod ranking;
pub mod skill_gap;
pub mod analyzer;

pub use analyzer::{AnalysisEngine, SearchRequest};
pub use ranking::{Opportunity, RankingEngine, SearchSession};
pub use relevance::SkillProfile;
