//! Run configuration, loadable from YAML.

use crate::error::{Result, SplitError};
use crate::filter::AlignOrder;
use crate::split::StratifiedSplit;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Label written by upstream annotation for cells without a type.
pub const UNCLASSIFIED_LABEL: &str = "Unclassified";

/// Configuration of a split run.
///
/// Every field has a default, so a YAML file only needs the fields it changes:
///
/// ```yaml
/// label_column: 9
/// min_category_size: 30
/// split:
///   seed: 1337
///   generation_fraction: 0.8
///   shuffle: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Field delimiter of the count file.
    pub count_delimiter: char,
    /// Field delimiter of the label file.
    pub label_delimiter: char,
    /// Field delimiter of all four output files.
    pub output_delimiter: char,
    /// Index of the label column, counted after the cell ID column.
    pub label_column: usize,
    /// Label value whose rows are removed before alignment.
    pub unclassified_label: String,
    /// Categories need strictly more cells than this to be kept.
    pub min_category_size: usize,
    /// Hard floor checked after filtering; categories at or below fail the run.
    pub min_members: usize,
    /// Row order of the aligned tables.
    pub align_order: AlignOrder,
    /// Stratified split parameters.
    pub split: StratifiedSplit,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            count_delimiter: ',',
            label_delimiter: ';',
            output_delimiter: ',',
            label_column: 9,
            unclassified_label: UNCLASSIFIED_LABEL.to_string(),
            min_category_size: 30,
            min_members: 2,
            align_order: AlignOrder::Labels,
            split: StratifiedSplit::default(),
        }
    }
}

impl SplitConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(SplitError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(SplitError::from)
    }

    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| SplitError::file_access(path, e))?;
        Self::from_yaml(&yaml)
    }

    /// Check parameter ranges and delimiters.
    pub fn validate(&self) -> Result<()> {
        self.split.validate()?;
        self.count_delimiter_byte()?;
        self.label_delimiter_byte()?;
        self.output_delimiter_byte()?;
        Ok(())
    }

    /// Delimiter byte for the count matrix input.
    pub fn count_delimiter_byte(&self) -> Result<u8> {
        delimiter_byte(self.count_delimiter, "count_delimiter")
    }

    /// Delimiter byte for the label table input.
    pub fn label_delimiter_byte(&self) -> Result<u8> {
        delimiter_byte(self.label_delimiter, "label_delimiter")
    }

    /// Delimiter byte for the four output files.
    pub fn output_delimiter_byte(&self) -> Result<u8> {
        delimiter_byte(self.output_delimiter, "output_delimiter")
    }
}

fn delimiter_byte(c: char, name: &str) -> Result<u8> {
    if c.is_ascii() && c != '"' && c != '\n' && c != '\r' {
        Ok(c as u8)
    } else {
        Err(SplitError::InvalidParameter(format!(
            "{} must be a single ASCII character other than a quote or newline, got {:?}",
            name, c
        )))
    }
}
