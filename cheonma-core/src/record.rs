//! Transaction records produced by field extraction and classification.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::InputError;

/// Longest merchant/location string kept on a record, in characters.
pub const MAX_LOCATION_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl Direction {
    pub fn is_income(&self) -> bool {
        matches!(self, Direction::Income)
    }
}

/// Payment methods, in the order their keyword sets are tested.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    #[serde(rename = "cash")]
    Cash,
    #[serde(rename = "card")]
    Card,
    #[serde(rename = "transfer")]
    Transfer,
    #[serde(rename = "mobile-pay")]
    MobilePay,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Transfer,
        PaymentMethod::MobilePay,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::MobilePay => "mobile-pay",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "transfer" => Ok(PaymentMethod::Transfer),
            "mobile-pay" => Ok(PaymentMethod::MobilePay),
            _ => Err(InputError::UnknownPaymentMethod(s.trim().to_string())),
        }
    }
}

/// Where the occurrence time of a record came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeSource {
    /// An explicit clock time in the text ("3시 20분", "14:30")
    #[serde(rename = "stated")]
    Stated,
    /// A relative-day keyword shifted the injected clock ("어제")
    #[serde(rename = "relative-day")]
    RelativeDay,
    /// Nothing in the text; the injected clock was used as-is
    #[serde(rename = "clock")]
    Clock,
}

/// A partially structured transaction extracted from one utterance, before
/// category classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateRecord {
    /// KRW, 0 when no amount could be read
    pub amount: u64,
    pub description: String,
    /// At most [`MAX_LOCATION_CHARS`] characters
    pub merchant_location: Option<String>,
    pub occurs_at: NaiveDateTime,
    pub time_source: TimeSource,
    pub direction: Direction,
    pub payment_method: PaymentMethod,
    pub raw_text: String,
    /// Extraction quality (0.0 - 1.0), unrelated to classification confidence
    pub extraction_confidence: f64,
}

impl CandidateRecord {
    pub fn is_income(&self) -> bool {
        self.direction.is_income()
    }

    pub fn is_expense(&self) -> bool {
        !self.is_income()
    }
}

/// Values the caller already knows and declares alongside the utterance.
/// Declared values take precedence over extracted ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractionHints {
    pub amount: Option<i64>,
    pub occurs_at: Option<NaiveDateTime>,
    pub payment_method: Option<PaymentMethod>,
    pub location: Option<String>,
}

impl ExtractionHints {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.occurs_at.is_none()
            && self.payment_method.is_none()
            && self.location.is_none()
    }

    /// Reject declared values no record may carry.
    pub fn validate(&self) -> Result<(), InputError> {
        if let Some(amount) = self.amount {
            if amount < 0 {
                return Err(InputError::NegativeAmount(amount));
            }
        }
        if let Some(location) = &self.location {
            let len = location.chars().count();
            if len > MAX_LOCATION_CHARS {
                return Err(InputError::LocationTooLong { len, max: MAX_LOCATION_CHARS });
            }
        }
        Ok(())
    }
}

/// Final category assignment handed to confirmation, persistence and analytics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    pub category: Category,
    /// Always one of `category`'s subcategory labels
    pub subcategory: Option<String>,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub rationale: Vec<String>,
}
