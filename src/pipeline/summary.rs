//! Run summary reported after a split.

use super::config::SplitConfig;
use crate::error::{Result, SplitError};
use crate::split::CategorySplit;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Row counts at each stage of a run, plus per-category split sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    /// Cells in the count matrix as loaded.
    pub n_count_cells: usize,
    /// Features in the count matrix.
    pub n_features: usize,
    /// Rows in the label table as loaded.
    pub n_label_rows: usize,
    /// Label rows removed for carrying the unclassified label.
    pub n_unclassified: usize,
    /// Cells present in both tables.
    pub n_aligned: usize,
    /// Cells left after dropping low-support categories.
    pub n_filtered: usize,
    /// Categories removed by the support filter, with their support.
    pub dropped_categories: Vec<(String, usize)>,
    /// Cells in the generation set.
    pub n_generation: usize,
    /// Cells in the validation set.
    pub n_validation: usize,
    /// Mean total counts per cell in the generation set.
    pub generation_mean_library_size: Option<f64>,
    /// Mean total counts per cell in the validation set.
    pub validation_mean_library_size: Option<f64>,
    /// Per-category split sizes, ordered by label.
    pub categories: Vec<CategorySplit>,
    /// Configuration the run used.
    pub config: SplitConfig,
}

impl SplitSummary {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON to a file.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .map_err(|e| SplitError::file_access(path, e))
    }
}

impl std::fmt::Display for SplitSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Split Summary")?;
        writeln!(
            f,
            "  Counts loaded:   {} cells x {} features",
            self.n_count_cells, self.n_features
        )?;
        writeln!(f, "  Labels loaded:   {}", self.n_label_rows)?;
        writeln!(f, "  Unclassified:    {}", self.n_unclassified)?;
        writeln!(f, "  Aligned:         {}", self.n_aligned)?;
        writeln!(f, "  After filtering: {}", self.n_filtered)?;
        writeln!(f, "  Generation:      {}", self.n_generation)?;
        writeln!(f, "  Validation:      {}", self.n_validation)?;
        writeln!(f, "  By category:")?;
        for c in &self.categories {
            writeln!(
                f,
                "    {}: {} -> {} / {}",
                c.label, c.n_total, c.n_generation, c.n_validation
            )?;
        }
        Ok(())
    }
}

/// Mean of a slice, `None` when empty.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
    }
}
