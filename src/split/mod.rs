//! Stratified partition of cells into generation and validation sets.

mod stratified;

pub use stratified::{
    check_partition, split_stratified, CategorySplit, SplitIndices, StratifiedSplit, DEFAULT_SEED,
};
