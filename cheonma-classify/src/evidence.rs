//! Evidence tuples exchanged between generators and the aggregator.

use cheonma_core::{Category, InputError};
use serde::{Deserialize, Serialize};

/// One signal's vote for a category. Lives only inside a single
/// classification call.
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    pub category: Category,
    /// Only keyword evidence proposes a subcategory
    pub subcategory: Option<&'static str>,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub rationale: Vec<String>,
}

impl Evidence {
    pub fn new(category: Category, confidence: f64, rationale: impl Into<String>) -> Self {
        Self {
            category,
            subcategory: None,
            confidence,
            rationale: vec![rationale.into()],
        }
    }

    pub fn with_subcategory(mut self, subcategory: Option<&'static str>) -> Self {
        self.subcategory = subcategory;
        self
    }
}

/// A category suggestion resolved outside the engine (e.g. by a remote model).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiHint {
    /// Category id ("food") or display name ("식비")
    pub category_name: String,
    pub confidence: f64,
}

impl AiHint {
    pub fn new(category_name: impl Into<String>, confidence: f64) -> Self {
        Self {
            category_name: category_name.into(),
            confidence,
        }
    }

    /// Strict form for caller-declared hints.
    pub fn checked(category_name: impl Into<String>, confidence: f64) -> Result<Self, InputError> {
        let category_name = category_name.into();
        if Category::from_name(&category_name).is_none() {
            return Err(InputError::UnknownCategory(category_name));
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(InputError::ConfidenceOutOfRange(confidence));
        }
        Ok(Self::new(category_name, confidence))
    }

    /// Reported confidence forced into 0.0..=1.0; NaN and infinities count as 0.
    pub fn clamped_confidence(&self) -> f64 {
        if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
