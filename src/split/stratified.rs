//! Label-stratified generation/validation split.
//!
//! Each category is split on its own so that both sets keep the category
//! composition of the input. Positions refer to rows of the filtered tables.

use crate::error::{Result, SplitError};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Default seed for the split RNG.
pub const DEFAULT_SEED: u64 = 1337;

/// Parameters of the stratified split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StratifiedSplit {
    /// Seed for the RNG shared by all categories.
    pub seed: u64,
    /// Fraction of each category assigned to the generation set (0.0-1.0).
    pub generation_fraction: f64,
    /// Shuffle each category before cutting it.
    pub shuffle: bool,
}

impl Default for StratifiedSplit {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            generation_fraction: 1.0,
            shuffle: false,
        }
    }
}

impl StratifiedSplit {
    /// Check the fraction is finite and within [0, 1].
    pub fn validate(&self) -> Result<()> {
        if !self.generation_fraction.is_finite() || !(0.0..=1.0).contains(&self.generation_fraction)
        {
            return Err(SplitError::InvalidParameter(format!(
                "generation fraction must be between 0 and 1, got {}",
                self.generation_fraction
            )));
        }
        Ok(())
    }

    /// Number of members of a category of size `n` that go to generation.
    ///
    /// Halves round to even.
    pub fn n_generation(&self, n: usize) -> usize {
        let n_generation = (n as f64 * self.generation_fraction).round_ties_even() as usize;
        n_generation.min(n)
    }
}

/// Split sizes for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySplit {
    /// Category label.
    pub label: String,
    /// Members in the filtered input.
    pub n_total: usize,
    /// Members assigned to the generation set.
    pub n_generation: usize,
    /// Members assigned to the validation set.
    pub n_validation: usize,
}

/// Row positions of the two output sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIndices {
    /// Generation positions, ascending.
    pub generation: Vec<usize>,
    /// Validation positions, ascending.
    pub validation: Vec<usize>,
    /// Per-category sizes, ordered by label.
    pub categories: Vec<CategorySplit>,
}

impl SplitIndices {
    /// Total number of positions across both sets.
    pub fn len(&self) -> usize {
        self.generation.len() + self.validation.len()
    }

    /// True when both sets are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split row positions into generation and validation sets per category.
///
/// `labels[i]` is the category of row `i`. Categories are processed in
/// ascending label order with a single RNG seeded once from `config.seed`,
/// so the category order is part of the reproducibility contract when
/// shuffling is enabled.
///
/// # Errors
/// `InvalidParameter` for a fraction outside [0, 1]; `Integrity` if the two
/// sets overlap or do not cover every row.
pub fn split_stratified<S: AsRef<str>>(
    labels: &[S],
    config: &StratifiedSplit,
) -> Result<SplitIndices> {
    config.validate()?;

    let mut by_category: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (pos, label) in labels.iter().enumerate() {
        by_category.entry(label.as_ref()).or_default().push(pos);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut generation = Vec::with_capacity(labels.len());
    let mut validation = Vec::new();
    let mut categories = Vec::with_capacity(by_category.len());

    for (label, mut members) in by_category {
        if config.shuffle {
            members.shuffle(&mut rng);
        }
        let n_generation = config.n_generation(members.len());
        let (gen_part, val_part) = members.split_at(n_generation);
        generation.extend_from_slice(gen_part);
        validation.extend_from_slice(val_part);

        log::debug!(
            "category '{}': {} generation, {} validation",
            label,
            gen_part.len(),
            val_part.len()
        );
        categories.push(CategorySplit {
            label: label.to_string(),
            n_total: members.len(),
            n_generation: gen_part.len(),
            n_validation: val_part.len(),
        });
    }

    generation.sort_unstable();
    validation.sort_unstable();

    let split = SplitIndices {
        generation,
        validation,
        categories,
    };
    check_partition(&split, labels.len())?;
    Ok(split)
}

/// Verify the two sets are disjoint and together cover `0..n_rows` exactly once.
pub fn check_partition(split: &SplitIndices, n_rows: usize) -> Result<()> {
    let generation: HashSet<usize> = split.generation.iter().copied().collect();
    if let Some(pos) = split.validation.iter().find(|p| generation.contains(*p)) {
        return Err(SplitError::Integrity(format!(
            "validation and generation sets are not disjoint (row {})",
            pos
        )));
    }

    let mut seen = vec![false; n_rows];
    for &pos in split.generation.iter().chain(&split.validation) {
        match seen.get_mut(pos) {
            Some(flag) if !*flag => *flag = true,
            Some(_) => {
                return Err(SplitError::Integrity(format!("row {} assigned twice", pos)));
            }
            None => {
                return Err(SplitError::Integrity(format!(
                    "row {} out of range ({} rows)",
                    pos, n_rows
                )));
            }
        }
    }
    if let Some(missing) = seen.iter().position(|&assigned| !assigned) {
        return Err(SplitError::Integrity(format!(
            "row {} assigned to neither set",
            missing
        )));
    }
    Ok(())
}
