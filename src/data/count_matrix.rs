//! Cell-by-feature count matrix with sparse storage.

use super::CELL_INDEX_LABEL;
use crate::error::{Result, SplitError};
use rayon::prelude::*;
use sprs::{CsMat, TriMat};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A sparse count matrix storing expression counts per cell.
///
/// Rows represent cells, columns represent features (genes). On disk the
/// matrix is stored the other way round (genes as rows, cells as columns);
/// [`CountMatrix::from_csv`] transposes while loading.
#[derive(Debug, Clone)]
pub struct CountMatrix {
    /// Sparse matrix in CSR format (cells × features)
    data: CsMat<f64>,
    /// Cell identifiers (row names)
    cell_ids: Vec<String>,
    /// Feature identifiers (column names)
    feature_ids: Vec<String>,
}

impl CountMatrix {
    /// Create a new CountMatrix from a sparse matrix and identifiers.
    ///
    /// Cell identifiers must be unique.
    pub fn new(data: CsMat<f64>, cell_ids: Vec<String>, feature_ids: Vec<String>) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if nrows != cell_ids.len() {
            return Err(SplitError::DimensionMismatch {
                expected: nrows,
                actual: cell_ids.len(),
            });
        }
        if ncols != feature_ids.len() {
            return Err(SplitError::DimensionMismatch {
                expected: ncols,
                actual: feature_ids.len(),
            });
        }
        ensure_unique(&cell_ids)?;
        Ok(Self {
            data,
            cell_ids,
            feature_ids,
        })
    }

    /// Load a count matrix stored genes-as-rows, cells-as-columns.
    ///
    /// Expected format:
    /// - First row: header; the first field names the gene column (may be
    ///   empty), the remaining fields are cell IDs
    /// - Subsequent rows: gene ID followed by one count per cell
    pub fn from_csv<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SplitError::file_access(path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let header = reader.headers()?.clone();
        if header.len() < 2 {
            return Err(SplitError::EmptyData(format!(
                "Count file '{}' must have at least one cell column",
                path.display()
            )));
        }
        let cell_ids: Vec<String> = header.iter().skip(1).map(String::from).collect();
        let n_cells = cell_ids.len();

        // Triplets are collected already transposed: (cell, gene, value)
        let mut triplets: Vec<(usize, usize, f64)> = Vec::new();
        let mut feature_ids: Vec<String> = Vec::new();

        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            // Records share the header's width, so the gene field is present
            let gene_idx = feature_ids.len();
            feature_ids.push(record[0].to_string());

            for (col_idx, value_str) in record.iter().skip(1).enumerate() {
                let value = parse_count(value_str).ok_or_else(|| SplitError::InvalidCount {
                    value: value_str.to_string(),
                    row: row_idx,
                    col: col_idx,
                })?;
                if value > 0.0 {
                    triplets.push((col_idx, gene_idx, value));
                }
            }
        }

        let n_features = feature_ids.len();
        if n_features == 0 {
            return Err(SplitError::EmptyData(format!(
                "No genes in count file '{}'",
                path.display()
            )));
        }

        let mut tri_mat = TriMat::new((n_cells, n_features));
        for (row, col, val) in triplets {
            tri_mat.add_triplet(row, col, val);
        }

        Self::new(tri_mat.to_csr(), cell_ids, feature_ids)
    }

    /// Write the matrix cells-as-rows with a leading `cell` column.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P, delimiter: u8) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| SplitError::file_access(path, e))?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(BufWriter::new(file));

        writer.write_record(
            std::iter::once(CELL_INDEX_LABEL).chain(self.feature_ids.iter().map(String::as_str)),
        )?;

        for (row, cell_id) in self.cell_ids.iter().enumerate() {
            let values = self.row_dense(row).into_iter().map(format_count);
            writer.write_record(std::iter::once(cell_id.clone()).chain(values))?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Get the value at (row, col), returning 0 for missing entries.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data.get(row, col).copied().unwrap_or(0.0)
    }

    /// Number of cells (rows).
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.data.rows()
    }

    /// Number of features (columns).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.data.cols()
    }

    /// Total number of non-zero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.nnz()
    }

    /// Cell identifiers.
    #[inline]
    pub fn cell_ids(&self) -> &[String] {
        &self.cell_ids
    }

    /// Feature identifiers.
    #[inline]
    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    /// Get the underlying sparse matrix.
    #[inline]
    pub fn data(&self) -> &CsMat<f64> {
        &self.data
    }

    /// Map from cell ID to row index.
    pub fn cell_index(&self) -> HashMap<&str, usize> {
        self.cell_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect()
    }

    /// Get a dense vector for a specific row (cell).
    pub fn row_dense(&self, row: usize) -> Vec<f64> {
        let mut dense = vec![0.0; self.n_features()];
        if let Some(row_vec) = self.data.outer_view(row) {
            for (col, &val) in row_vec.iter() {
                dense[col] = val;
            }
        }
        dense
    }

    /// Total counts per cell.
    pub fn library_sizes(&self) -> Vec<f64> {
        (0..self.n_cells())
            .into_par_iter()
            .map(|row| {
                self.data
                    .outer_view(row)
                    .map(|v| v.iter().map(|(_, &val)| val).sum())
                    .unwrap_or(0.0)
            })
            .collect()
    }

    /// Subset the matrix to the specified cells (by row index), in the given order.
    pub fn subset_cells(&self, indices: &[usize]) -> Result<Self> {
        let n_cells = indices.len();
        let n_features = self.n_features();

        let mut tri_mat = TriMat::new((n_cells, n_features));
        let mut new_cell_ids = Vec::with_capacity(n_cells);

        for (new_row, &old_row) in indices.iter().enumerate() {
            if old_row >= self.n_cells() {
                return Err(SplitError::InvalidParameter(format!(
                    "Cell index {} out of bounds",
                    old_row
                )));
            }
            new_cell_ids.push(self.cell_ids[old_row].clone());

            if let Some(row_vec) = self.data.outer_view(old_row) {
                for (col, &val) in row_vec.iter() {
                    tri_mat.add_triplet(new_row, col, val);
                }
            }
        }

        Self::new(tri_mat.to_csr(), new_cell_ids, self.feature_ids.clone())
    }
}

/// Parse a single count token. Counts must be finite and non-negative.
fn parse_count(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Shortest decimal form that round-trips (`3`, `0.5`).
fn format_count(value: f64) -> String {
    value.to_string()
}

pub(crate) fn ensure_unique(ids: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(SplitError::DuplicateId(id.clone()));
        }
    }
    Ok(())
}
