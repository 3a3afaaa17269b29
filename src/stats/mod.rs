//! Stats module - normalization and comparison scores

pub mod normalize;
mod summary;

pub use normalize::{NormalizeError, NormalizedTable, DEFAULT_CAP};
pub use summary::{summarize, DatasetSummary, SeriesSummary};
