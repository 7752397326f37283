//! Pure numeric helpers over series windows.

pub mod summary;

pub use summary::{SeriesSummary, classify, summarize};
