//! Stratified generation/validation split for single-cell data.
//!
//! Partitions a single-cell count matrix and its cell-type labels into two
//! disjoint sets: a *generation* set used to synthesize spatial
//! transcriptomics data and a *validation* set kept aside for evaluation.
//!
//! # Overview
//!
//! - **data**: Core tables (CountMatrix, LabelTable)
//! - **profile**: Category support counts
//! - **filter**: Unclassified removal, alignment, support filtering
//! - **split**: Per-category seeded partition with integrity checks
//! - **pipeline**: Configuration, execution and output naming
//!
//! # Example
//!
//! ```no_run
//! use scsplit::prelude::*;
//! use std::path::Path;
//!
//! let summary = Splitter::new()
//!     .generation_fraction(0.8)
//!     .shuffle(true)
//!     .run_files(
//!         Path::new("sc_counts.csv"),
//!         Path::new("sc_labels.csv"),
//!         Path::new("out"),
//!     )
//!     .unwrap();
//! println!("{}", summary);
//! ```

pub mod data;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod profile;
pub mod split;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{CountMatrix, LabelTable, CELL_INDEX_LABEL};
    pub use crate::error::{Result, SplitError};
    pub use crate::filter::{
        align_tables, check_min_members, drop_category, filter_category_support, AlignOrder,
        SupportFilterResult,
    };
    pub use crate::pipeline::{
        run_split, OutputPaths, SplitConfig, SplitOutcome, SplitSummary, Splitter,
        UNCLASSIFIED_LABEL,
    };
    pub use crate::profile::{profile_categories, CategoryProfile};
    pub use crate::split::{
        check_partition, split_stratified, CategorySplit, SplitIndices, StratifiedSplit,
        DEFAULT_SEED,
    };
}
