//! cheonma-core: budget taxonomy, transaction record types and spending summaries

pub mod analytics;
pub mod category;
pub mod error;
pub mod record;
pub mod time;

pub use analytics::{summarize, CategoryTotal, ClassifiedTransaction, Summary, SummaryCache, TimeWindow};
pub use category::{Category, CategoryInfo, KeywordGroup, TAXONOMY};
pub use error::InputError;
pub use record::{
    CandidateRecord, ClassificationResult, Direction, ExtractionHints, PaymentMethod, TimeSource,
    MAX_LOCATION_CHARS,
};
pub use time::Daypart;
