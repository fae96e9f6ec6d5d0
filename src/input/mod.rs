//! Posting input module
//! Provider adapters, local sources, and the manager that combines them

pub mod posting;
pub mod sources;
pub mod adzuna;
pub mod jsearch;
pub mod manager;

pub use posting::Posting;
pub use sources::PostingSource;
