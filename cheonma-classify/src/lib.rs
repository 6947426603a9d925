//! cheonma-classify: evidence generators and evidence fusion for budget categories

pub mod aggregator;
pub mod config;
pub mod evidence;
pub mod generators;

pub use aggregator::{classify_income, fuse, Classifier, FALLBACK_CONFIDENCE, FALLBACK_RATIONALE};
pub use config::ClassifierConfig;
pub use evidence::{AiHint, Evidence};
