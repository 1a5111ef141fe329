pub mod batch;
pub mod detect;
pub mod domain;
pub mod error;
pub mod index;
pub mod merge;
pub mod options;
pub mod scan;
pub mod similarity;
pub mod stats;
pub mod time;

pub use batch::{
    BatchResult, BatchSummary, Consolidator, DuplicateOutcome, InvalidOutcome, UpdateOutcome,
};
pub use detect::{DuplicateMatch, MatchTier};
pub use domain::*;
pub use error::CoreError;
pub use merge::merge_records;
pub use options::EngineOptions;
pub use scan::DuplicatePair;
pub use similarity::{NameScorer, Similarity, TokenOverlapScorer};
pub use stats::Statistics;
