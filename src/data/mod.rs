//! Data structures for the count matrix and the per-cell label table.

mod count_matrix;
mod labels;

pub use count_matrix::CountMatrix;
pub use labels::LabelTable;

/// Header of the identifier column in every output table.
pub const CELL_INDEX_LABEL: &str = "cell";
