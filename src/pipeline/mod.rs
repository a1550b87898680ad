//! Split pipeline: configuration, execution and output.

mod config;
mod output;
mod runner;
mod summary;

pub use config::{SplitConfig, UNCLASSIFIED_LABEL};
pub use output::{OutputPaths, GENERATION_PREFIX, VALIDATION_PREFIX};
pub use runner::{run_split, SplitOutcome, Splitter};
pub use summary::SplitSummary;
