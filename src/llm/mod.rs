//! Text-generation integration and career advice

pub mod generator;
pub mod prompts;
pub mod advisor;

pub use advisor::{Advice, AdviceComposer, AdviceOrigin};
pub use generator::{GeminiClient, TextGenerator};
