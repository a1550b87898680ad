//! Output file naming.

use crate::error::{Result, SplitError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name prefix of the generation set.
pub const GENERATION_PREFIX: &str = "generation";
/// File name prefix of the validation set.
pub const VALIDATION_PREFIX: &str = "validation";

/// Paths of the four output tables.
///
/// Each name is the input file's base name prefixed with `generation.` or
/// `validation.`, e.g. `sc_counts.csv` becomes `validation.sc_counts.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub validation_counts: PathBuf,
    pub generation_counts: PathBuf,
    pub validation_labels: PathBuf,
    pub generation_labels: PathBuf,
}

impl OutputPaths {
    /// Derive output paths under `out_dir` from the two input paths.
    pub fn new(out_dir: &Path, counts_path: &Path, labels_path: &Path) -> Result<Self> {
        Ok(Self {
            validation_counts: prefixed(out_dir, VALIDATION_PREFIX, counts_path)?,
            generation_counts: prefixed(out_dir, GENERATION_PREFIX, counts_path)?,
            validation_labels: prefixed(out_dir, VALIDATION_PREFIX, labels_path)?,
            generation_labels: prefixed(out_dir, GENERATION_PREFIX, labels_path)?,
        })
    }

    /// All four paths, in write order.
    pub fn all(&self) -> [&Path; 4] {
        [
            self.validation_counts.as_path(),
            self.generation_counts.as_path(),
            self.validation_labels.as_path(),
            self.generation_labels.as_path(),
        ]
    }
}

fn prefixed(out_dir: &Path, prefix: &str, input: &Path) -> Result<PathBuf> {
    let base = input.file_name().ok_or_else(|| {
        SplitError::InvalidParameter(format!(
            "input path '{}' has no file name",
            input.display()
        ))
    })?;
    let mut name = OsString::from(prefix);
    name.push(".");
    name.push(base);
    Ok(out_dir.join(name))
}
