//! cheonma-ingest: field extraction from free-form transaction utterances.

pub mod extractor;
pub mod lexicon;

pub use extractor::{extract_direction, extraction_confidence, FieldExtractor};
