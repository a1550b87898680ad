//! Split runner: filter, align, split and write.

use super::config::SplitConfig;
use super::output::OutputPaths;
use super::summary::{mean, SplitSummary};
use crate::data::{CountMatrix, LabelTable};
use crate::error::Result;
use crate::filter::{align_tables, check_min_members, drop_category, filter_category_support};
use crate::profile::profile_categories;
use crate::split::split_stratified;
use std::path::Path;

/// The four output tables of a run and its summary.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub generation_counts: CountMatrix,
    pub validation_counts: CountMatrix,
    pub generation_labels: LabelTable,
    pub validation_labels: LabelTable,
    pub summary: SplitSummary,
}

impl SplitOutcome {
    /// Write the four tables.
    ///
    /// Files are written one after another; if one fails, those already
    /// written stay on disk.
    pub fn write(&self, paths: &OutputPaths, delimiter: u8) -> Result<()> {
        self.validation_counts.to_csv(&paths.validation_counts, delimiter)?;
        self.generation_counts.to_csv(&paths.generation_counts, delimiter)?;
        self.validation_labels.to_csv(&paths.validation_labels, delimiter)?;
        self.generation_labels.to_csv(&paths.generation_labels, delimiter)?;
        for path in paths.all() {
            log::info!("Wrote {}", path.display());
        }
        Ok(())
    }
}

/// Builder for configuring and running a split.
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    config: SplitConfig,
}

impl Splitter {
    /// Create a splitter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a config.
    pub fn from_config(config: SplitConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Set the label column index (counted after the cell ID column).
    pub fn label_column(mut self, column: usize) -> Self {
        self.config.label_column = column;
        self
    }

    /// Set the RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.split.seed = seed;
        self
    }

    /// Set the fraction of each category assigned to generation.
    pub fn generation_fraction(mut self, fraction: f64) -> Self {
        self.config.split.generation_fraction = fraction;
        self
    }

    /// Shuffle each category before cutting it.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.config.split.shuffle = shuffle;
        self
    }

    /// Set the support threshold (categories need strictly more cells).
    pub fn min_category_size(mut self, min: usize) -> Self {
        self.config.min_category_size = min;
        self
    }

    /// Run on loaded tables.
    pub fn run(&self, counts: &CountMatrix, labels: &LabelTable) -> Result<SplitOutcome> {
        let config = &self.config;
        config.validate()?;
        let column = config.label_column;

        let (classified, n_unclassified) =
            drop_category(labels, column, &config.unclassified_label)?;
        log::info!(
            "Dropped {} of {} label rows marked '{}'",
            n_unclassified,
            labels.n_cells(),
            config.unclassified_label
        );

        let (aligned_counts, aligned_labels) =
            align_tables(counts, &classified, config.align_order)?;
        log::info!(
            "Aligned {} cells shared by counts ({}) and labels ({})",
            aligned_labels.n_cells(),
            counts.n_cells(),
            classified.n_cells()
        );

        let (filtered_counts, filtered_labels, support) = filter_category_support(
            &aligned_counts,
            &aligned_labels,
            column,
            config.min_category_size,
        )?;
        for (label, n) in &support.dropped {
            log::debug!("Dropped category '{}' with {} cells", label, n);
        }
        log::info!(
            "Kept {} categories ({} cells) with more than {} cells",
            support.kept.len(),
            support.n_after,
            config.min_category_size
        );

        if filtered_labels.n_cells() == 0 {
            log::warn!("No cells left after filtering and alignment; outputs will be empty");
        }

        let profile = profile_categories(&filtered_labels, column)?;
        check_min_members(&profile, config.min_members)?;

        let category_of_row = filtered_labels.column(column)?;
        let split = split_stratified(&category_of_row, &config.split)?;
        log::info!(
            "Split {} cells into {} generation and {} validation",
            split.len(),
            split.generation.len(),
            split.validation.len()
        );
        if split.validation.is_empty() {
            log::warn!(
                "Validation set is empty (generation fraction {})",
                config.split.generation_fraction
            );
        }

        let generation_counts = filtered_counts.subset_cells(&split.generation)?;
        let validation_counts = filtered_counts.subset_cells(&split.validation)?;
        let generation_labels = filtered_labels.subset_rows(&split.generation)?;
        let validation_labels = filtered_labels.subset_rows(&split.validation)?;

        let summary = SplitSummary {
            n_count_cells: counts.n_cells(),
            n_features: counts.n_features(),
            n_label_rows: labels.n_cells(),
            n_unclassified,
            n_aligned: aligned_labels.n_cells(),
            n_filtered: filtered_labels.n_cells(),
            dropped_categories: support.dropped,
            n_generation: split.generation.len(),
            n_validation: split.validation.len(),
            generation_mean_library_size: mean(&generation_counts.library_sizes()),
            validation_mean_library_size: mean(&validation_counts.library_sizes()),
            categories: split.categories,
            config: config.clone(),
        };

        Ok(SplitOutcome {
            generation_counts,
            validation_counts,
            generation_labels,
            validation_labels,
            summary,
        })
    }

    /// Load both inputs, run, and write the four outputs under `out_dir`.
    pub fn run_files(
        &self,
        counts_path: &Path,
        labels_path: &Path,
        out_dir: &Path,
    ) -> Result<SplitSummary> {
        let config = &self.config;
        config.validate()?;
        let paths = OutputPaths::new(out_dir, counts_path, labels_path)?;

        log::info!("Loading counts from {}", counts_path.display());
        let counts = CountMatrix::from_csv(counts_path, config.count_delimiter_byte()?)?;
        log::info!(
            "Loaded {} cells x {} features",
            counts.n_cells(),
            counts.n_features()
        );

        log::info!("Loading labels from {}", labels_path.display());
        let labels = LabelTable::from_csv(labels_path, config.label_delimiter_byte()?)?;
        log::info!(
            "Loaded {} label rows with {} columns",
            labels.n_cells(),
            labels.n_columns()
        );

        let outcome = self.run(&counts, &labels)?;
        outcome.write(&paths, config.output_delimiter_byte()?)?;
        Ok(outcome.summary)
    }
}

/// Run a split with the given configuration on files.
pub fn run_split(
    counts_path: &Path,
    labels_path: &Path,
    out_dir: &Path,
    config: SplitConfig,
) -> Result<SplitSummary> {
    Splitter::from_config(config).run_files(counts_path, labels_path, out_dir)
}
