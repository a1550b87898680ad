//! Category support filtering.
//!
//! Removes cells whose category has too few members to be split, then
//! checks that every remaining category clears a hard minimum.

use crate::data::{CountMatrix, LabelTable};
use crate::error::{Result, SplitError};
use crate::profile::{profile_categories, CategoryProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of support filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportFilterResult {
    /// Number of cells before filtering.
    pub n_before: usize,
    /// Number of cells after filtering.
    pub n_after: usize,
    /// Categories kept, with their support.
    pub kept: Vec<(String, usize)>,
    /// Categories removed, with their support.
    pub dropped: Vec<(String, usize)>,
}

impl std::fmt::Display for SupportFilterResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Support Filter Result")?;
        writeln!(f, "  Cells before: {}", self.n_before)?;
        writeln!(f, "  Cells after:  {}", self.n_after)?;
        writeln!(f, "  Categories kept: {}", self.kept.len())?;
        for (label, n) in &self.dropped {
            writeln!(f, "    dropped {}: {}", label, n)?;
        }
        Ok(())
    }
}

/// Keep only cells whose category has more than `min_support` members.
///
/// Both tables must already be aligned (same cell IDs in the same order).
///
/// # Arguments
/// * `counts` - Aligned count matrix
/// * `labels` - Aligned label table
/// * `column` - Index of the label column
/// * `min_support` - Categories need strictly more members than this
pub fn filter_category_support(
    counts: &CountMatrix,
    labels: &LabelTable,
    column: usize,
    min_support: usize,
) -> Result<(CountMatrix, LabelTable, SupportFilterResult)> {
    if counts.cell_ids() != labels.cell_ids() {
        return Err(SplitError::Integrity(
            "count matrix and label table are not aligned".to_string(),
        ));
    }

    let profile = profile_categories(labels, column)?;
    let surviving: HashSet<&str> = profile.categories_above(min_support).into_iter().collect();

    let keep: Vec<usize> = labels
        .column(column)?
        .into_iter()
        .enumerate()
        .filter(|(_, label)| surviving.contains(label))
        .map(|(i, _)| i)
        .collect();

    let (kept, dropped): (Vec<(String, usize)>, Vec<(String, usize)>) = profile
        .support
        .iter()
        .map(|(label, &n)| (label.clone(), n))
        .partition(|(label, _)| surviving.contains(label.as_str()));

    let result = SupportFilterResult {
        n_before: labels.n_cells(),
        n_after: keep.len(),
        kept,
        dropped,
    };

    Ok((counts.subset_cells(&keep)?, labels.subset_rows(&keep)?, result))
}

/// Fail unless every category has more than `min_members` members.
pub fn check_min_members(profile: &CategoryProfile, min_members: usize) -> Result<()> {
    match profile.categories_at_or_below(min_members).first() {
        Some((label, n)) => Err(SplitError::Integrity(format!(
            "category '{}' has too few members ({} <= {})",
            label, n, min_members
        ))),
        None => Ok(()),
    }
}
