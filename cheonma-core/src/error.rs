use thiserror::Error;

/// Caller-side input the engine will not accept as declared context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("declared amount must not be negative: {0}")]
    NegativeAmount(i64),
    #[error("declared location is {len} characters long (max {max})")]
    LocationTooLong { len: usize, max: usize },
    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("confidence must be within 0.0..=1.0, got {0}")]
    ConfidenceOutOfRange(f64),
}
