//! Evidence generators. Each one reads a single signal from a candidate
//! record and votes for zero or more categories. They are pure and know
//! nothing about each other.

use chrono::Timelike;
use cheonma_core::{CandidateRecord, Category, Daypart, PaymentMethod};

use crate::evidence::{AiHint, Evidence};

/// Confidence per matched keyword.
const KEYWORD_WEIGHT: f64 = 0.2;
/// Added once when a matched keyword is longer than two characters.
const BRAND_BONUS: f64 = 0.4;
/// Scale of the amount-prior ratio.
const AMOUNT_PRIOR_WEIGHT: f64 = 0.3;
/// Amount evidence for a category without an average-amount prior.
const AMOUNT_FLAT: f64 = 0.1;
const TIME_OF_DAY_WEIGHT: f64 = 0.2;

/// Keyword hits per expense category over raw text, description and location.
pub fn keyword_evidence(record: &CandidateRecord) -> Vec<Evidence> {
    let search = [
        record.raw_text.as_str(),
        record.description.as_str(),
        record.merchant_location.as_deref().unwrap_or(""),
    ]
    .join(" ")
    .to_lowercase();

    Category::ALL
        .into_iter()
        .filter(|c| !c.is_income())
        .filter_map(|category| {
            let matched: Vec<&'static str> = category
                .keywords()
                .filter(|k| search.contains(&k.to_lowercase()))
                .collect();
            if matched.is_empty() {
                return None;
            }

            let mut score = matched.len() as f64 * KEYWORD_WEIGHT;
            if matched.iter().any(|k| k.chars().count() > 2) {
                score += BRAND_BONUS;
            }

            let evidence = Evidence::new(
                category,
                score.min(1.0),
                format!("keyword match: {}", matched.join(", ")),
            )
            .with_subcategory(resolve_subcategory(category, &search, &matched));
            Some(evidence)
        })
        .collect()
}

/// First subcategory with a `/`-token present in `search`; otherwise the
/// subcategory the first matched keyword is filed under.
pub fn resolve_subcategory(
    category: Category,
    search: &str,
    matched: &[&'static str],
) -> Option<&'static str> {
    category
        .subcategories()
        .iter()
        .copied()
        .find(|label| {
            label
                .split('/')
                .any(|token| search.contains(&token.to_lowercase()))
        })
        .or_else(|| matched.iter().find_map(|k| category.keyword_subcategory(k)))
}

/// Categories typical for an amount bracket.
pub fn amount_bracket(amount: u64) -> &'static [Category] {
    match amount {
        0..=5_000 => &[Category::Transport, Category::Food],
        5_001..=15_000 => &[Category::Food, Category::Transport],
        15_001..=30_000 => &[Category::Entertainment, Category::Shopping],
        30_001..=100_000 => &[Category::Shopping, Category::Healthcare, Category::Education],
        _ => &[Category::Housing, Category::Education],
    }
}

/// Closeness of the amount to each bracket category's average amount.
pub fn amount_range_evidence(record: &CandidateRecord) -> Vec<Evidence> {
    let amount = record.amount;
    if amount == 0 {
        return Vec::new();
    }

    amount_bracket(amount)
        .iter()
        .map(|&category| {
            let confidence = match category.average_amount() {
                Some(prior) if prior > 0 => {
                    let (lo, hi) = (amount.min(prior) as f64, amount.max(prior) as f64);
                    AMOUNT_PRIOR_WEIGHT * lo / hi
                }
                _ => AMOUNT_FLAT,
            };
            Evidence::new(
                category,
                confidence,
                format!("amount range match (₩{})", format_krw(amount)),
            )
        })
        .collect()
}

pub fn daypart_categories(daypart: Daypart) -> &'static [Category] {
    match daypart {
        Daypart::EarlyMorning => &[Category::Food, Category::Transport],
        Daypart::Midday => &[Category::Food],
        Daypart::Afternoon => &[Category::Food, Category::Shopping],
        Daypart::Evening | Daypart::LateNight => &[Category::Food, Category::Entertainment],
    }
}

pub fn time_of_day_evidence(record: &CandidateRecord) -> Vec<Evidence> {
    let hour = record.occurs_at.hour();
    let daypart = Daypart::from_hour(hour);

    daypart_categories(daypart)
        .iter()
        .map(|&category| {
            Evidence::new(
                category,
                TIME_OF_DAY_WEIGHT,
                format!("time-of-day pattern ({}, {hour}h)", daypart.label()),
            )
        })
        .collect()
}

pub fn payment_method_evidence(record: &CandidateRecord) -> Vec<Evidence> {
    match record.payment_method {
        PaymentMethod::Cash => vec![Evidence::new(
            Category::Food,
            0.15,
            "cash payment suggests small food spending",
        )],
        PaymentMethod::MobilePay => vec![Evidence::new(
            Category::Food,
            0.2,
            "mobile payment suggests convenience store or cafe",
        )],
        PaymentMethod::Transfer => vec![Evidence::new(
            Category::Utilities,
            0.15,
            "bank transfer suggests a bill or recurring payment",
        )],
        PaymentMethod::Card => Vec::new(),
    }
}

/// The caller's externally resolved suggestion as one more tuple. Names
/// outside the taxonomy, and Income, produce nothing.
pub fn ai_hint_evidence(hint: &AiHint) -> Vec<Evidence> {
    match Category::from_name(&hint.category_name) {
        Some(category) if !category.is_income() => vec![Evidence::new(
            category,
            hint.clamped_confidence(),
            format!("AI suggestion: {}", category.name()),
        )],
        Some(_) => {
            tracing::debug!(hint = %hint.category_name, "ignoring income hint on expense path");
            Vec::new()
        }
        None => {
            tracing::debug!(hint = %hint.category_name, "AI hint names no known category");
            Vec::new()
        }
    }
}

/// 1234567 -> "1,234,567"
pub fn format_krw(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
