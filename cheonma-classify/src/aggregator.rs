//! Evidence fusion: one final category per candidate record.
//!
//! Income records bypass fusion entirely. Expense records collect evidence
//! from every generator, sum confidence per category, and pick the highest
//! sum; ties go to the category declared first. A winning sum under
//! [`FALLBACK_FLOOR`] turns into the Other fallback, so classification is
//! total.

use cheonma_core::{CandidateRecord, Category, ClassificationResult, TimeSource};

use crate::config::ClassifierConfig;
use crate::evidence::{AiHint, Evidence};
use crate::generators::{
    ai_hint_evidence, amount_range_evidence, keyword_evidence, payment_method_evidence,
    time_of_day_evidence,
};

/// Minimum summed confidence for a category to win.
pub const FALLBACK_FLOOR: f64 = 0.1;
pub const FALLBACK_CONFIDENCE: f64 = 0.3;
pub const FALLBACK_RATIONALE: &str = "insufficient evidence, defaulted to other";

const INCOME_HIT_CONFIDENCE: f64 = 0.8;
const INCOME_DEFAULT_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(
        &self,
        raw_text: &str,
        record: &CandidateRecord,
        ai_hint: Option<&AiHint>,
    ) -> ClassificationResult {
        if record.is_income() {
            return classify_income(raw_text);
        }

        let evidence = self.collect_evidence(record, ai_hint);
        let result = fuse(&evidence);
        tracing::debug!(
            tuples = evidence.len(),
            category = result.category.id(),
            confidence = result.confidence,
            "fused classification"
        );
        result
    }

    /// Every generator's output in a fixed order: keyword, AI hint, amount
    /// range, time of day, payment method.
    pub fn collect_evidence(&self, record: &CandidateRecord, ai_hint: Option<&AiHint>) -> Vec<Evidence> {
        let mut evidence = keyword_evidence(record);
        if let Some(hint) = ai_hint {
            evidence.extend(ai_hint_evidence(hint));
        }
        evidence.extend(amount_range_evidence(record));
        if record.time_source == TimeSource::Stated || self.config.clock_time_evidence {
            evidence.extend(time_of_day_evidence(record));
        }
        evidence.extend(payment_method_evidence(record));
        evidence
    }

    /// Accepts a user's correction. Corrections are logged only; they do
    /// not change later classifications.
    pub fn learn_from_correction(
        &self,
        raw_text: &str,
        corrected_category: Category,
        corrected_subcategory: Option<&str>,
    ) {
        if let Some(sub) = corrected_subcategory {
            if !corrected_category.has_subcategory(sub) {
                tracing::warn!(
                    category = corrected_category.id(),
                    subcategory = sub,
                    "correction names a subcategory outside its category"
                );
            }
        }
        tracing::info!(
            raw_text,
            category = corrected_category.id(),
            subcategory = corrected_subcategory.unwrap_or(""),
            "received classification correction"
        );
    }
}

/// Income records: subcategory from the Income keyword groups, first hit wins.
pub fn classify_income(raw_text: &str) -> ClassificationResult {
    for group in Category::Income.info().keyword_groups {
        if let Some(keyword) = group.keywords.iter().find(|k| raw_text.contains(*k)) {
            return ClassificationResult {
                category: Category::Income,
                subcategory: group.subcategory.map(str::to_string),
                confidence: INCOME_HIT_CONFIDENCE,
                rationale: vec![format!("income keyword match: {keyword}")],
            };
        }
    }

    ClassificationResult {
        category: Category::Income,
        subcategory: None,
        confidence: INCOME_DEFAULT_CONFIDENCE,
        rationale: vec!["classified as income".to_string()],
    }
}

/// Additive fusion over a flat evidence list.
pub fn fuse(evidence: &[Evidence]) -> ClassificationResult {
    const N: usize = Category::ALL.len();
    let mut totals = [0.0f64; N];
    let mut rationale: [Vec<String>; N] = Default::default();
    let mut subcategory: [Option<&'static str>; N] = [None; N];

    for e in evidence {
        let i = e.category.index();
        totals[i] += e.confidence;
        rationale[i].extend(e.rationale.iter().cloned());
        if subcategory[i].is_none() {
            subcategory[i] = e.subcategory;
        }
    }

    let mut best: Option<Category> = None;
    let mut best_score = 0.0;
    for category in Category::ALL {
        // strict: an equal later sum never displaces an earlier category
        if totals[category.index()] > best_score {
            best = Some(category);
            best_score = totals[category.index()];
        }
    }

    match best {
        Some(category) if best_score >= FALLBACK_FLOOR => {
            let i = category.index();
            ClassificationResult {
                category,
                subcategory: subcategory[i].map(str::to_string),
                confidence: best_score.min(1.0),
                rationale: std::mem::take(&mut rationale[i]),
            }
        }
        _ => fallback(),
    }
}

fn fallback() -> ClassificationResult {
    ClassificationResult {
        category: Category::Other,
        subcategory: None,
        confidence: FALLBACK_CONFIDENCE,
        rationale: vec![FALLBACK_RATIONALE.to_string()],
    }
}
