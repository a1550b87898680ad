//! Category support profiling for label tables.

use crate::data::LabelTable;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of cells per category in a label column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProfile {
    /// Number of cells profiled.
    pub n_cells: usize,
    /// Support per category, ordered by label.
    pub support: BTreeMap<String, usize>,
}

impl CategoryProfile {
    /// Build a profile from label values.
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut support = BTreeMap::new();
        let mut n_cells = 0;
        for label in labels {
            *support.entry(label.to_string()).or_insert(0) += 1;
            n_cells += 1;
        }
        Self { n_cells, support }
    }

    /// Number of distinct categories.
    pub fn n_categories(&self) -> usize {
        self.support.len()
    }

    /// Support of a single category (0 if absent).
    pub fn support_of(&self, label: &str) -> usize {
        self.support.get(label).copied().unwrap_or(0)
    }

    /// Categories with support strictly greater than `min_support`.
    pub fn categories_above(&self, min_support: usize) -> Vec<&str> {
        self.support
            .iter()
            .filter(|(_, &n)| n > min_support)
            .map(|(label, _)| label.as_str())
            .collect()
    }

    /// Categories with support of at most `min_support`.
    pub fn categories_at_or_below(&self, min_support: usize) -> Vec<(&str, usize)> {
        self.support
            .iter()
            .filter(|(_, &n)| n <= min_support)
            .map(|(label, &n)| (label.as_str(), n))
            .collect()
    }

    /// The category with the fewest members (first by label on ties).
    pub fn smallest(&self) -> Option<(&str, usize)> {
        self.support
            .iter()
            .min_by_key(|(_, &n)| n)
            .map(|(label, &n)| (label.as_str(), n))
    }
}

impl std::fmt::Display for CategoryProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Category Profile")?;
        writeln!(f, "  Cells:      {}", self.n_cells)?;
        writeln!(f, "  Categories: {}", self.n_categories())?;
        for (label, n) in &self.support {
            writeln!(f, "    {}: {}", label, n)?;
        }
        Ok(())
    }
}

/// Profile category support of one label column.
pub fn profile_categories(labels: &LabelTable, column: usize) -> Result<CategoryProfile> {
    Ok(CategoryProfile::from_labels(labels.column(column)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_labels() {
        let profile = CategoryProfile::from_labels(["b", "a", "b", "c", "b"]);

        assert_eq!(profile.n_cells, 5);
        assert_eq!(profile.n_categories(), 3);
        assert_eq!(profile.support_of("b"), 3);
        assert_eq!(profile.support_of("z"), 0);
        let order: Vec<&str> = profile.support.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_threshold_queries() {
        let profile = CategoryProfile::from_labels(["a", "b", "b", "c", "c", "c"]);

        assert_eq!(profile.categories_above(1), vec!["b", "c"]);
        assert_eq!(profile.categories_above(2), vec!["c"]);
        assert_eq!(profile.categories_at_or_below(2), vec![("a", 1), ("b", 2)]);
        assert_eq!(profile.smallest(), Some(("a", 1)));
    }

    #[test]
    fn test_empty_profile() {
        let profile = CategoryProfile::from_labels(std::iter::empty());
        assert_eq!(profile.n_cells, 0);
        assert_eq!(profile.smallest(), None);
    }

    #[test]
    fn test_profile_categories_from_table() {
        let labels = LabelTable::new(
            "id",
            vec!["type".to_string()],
            vec!["c1".to_string(), "c2".to_string()],
            vec![vec!["A".to_string()], vec!["A".to_string()]],
        )
        .unwrap();

        let profile = profile_categories(&labels, 0).unwrap();
        assert_eq!(profile.support_of("A"), 2);
        assert!(profile_categories(&labels, 3).is_err());
    }
}
