//! Per-cell annotation table holding the cell-type labels.

use super::count_matrix::ensure_unique;
use super::CELL_INDEX_LABEL;
use crate::error::{Result, SplitError};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Cell annotations keyed by cell ID.
///
/// Values are kept as the raw strings read from disk so that they can be
/// written back unchanged. Rows keep their on-disk order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTable {
    /// Header of the identifier column as read from disk.
    index_name: String,
    /// Annotation column names (excluding the identifier column).
    column_names: Vec<String>,
    /// Cell IDs in row order.
    cell_ids: Vec<String>,
    /// One value per annotation column for every row.
    rows: Vec<Vec<String>>,
}

impl LabelTable {
    /// Create a label table, checking row widths and ID uniqueness.
    pub fn new(
        index_name: impl Into<String>,
        column_names: Vec<String>,
        cell_ids: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self> {
        if rows.len() != cell_ids.len() {
            return Err(SplitError::DimensionMismatch {
                expected: cell_ids.len(),
                actual: rows.len(),
            });
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != column_names.len()) {
            return Err(SplitError::DimensionMismatch {
                expected: column_names.len(),
                actual: bad.len(),
            });
        }
        ensure_unique(&cell_ids)?;
        Ok(Self {
            index_name: index_name.into(),
            column_names,
            cell_ids,
            rows,
        })
    }

    /// Load a label table.
    ///
    /// Expected format:
    /// - First row: header with column names (first column is the cell ID)
    /// - Subsequent rows: cell ID followed by annotation values
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
                "Label file '{}' must have at least one annotation column",
                path.display()
            )));
        }
        let index_name = header.get(0).unwrap_or_default().to_string();
        let column_names: Vec<String> = header.iter().skip(1).map(String::from).collect();

        let mut cell_ids = Vec::new();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut fields = record.iter().map(String::from);
            let Some(cell_id) = fields.next() else {
                continue;
            };
            cell_ids.push(cell_id);
            rows.push(fields.collect());
        }

        Self::new(index_name, column_names, cell_ids, rows)
    }

    /// Write the table with a leading `cell` column.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P, delimiter: u8) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| SplitError::file_access(path, e))?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(BufWriter::new(file));

        writer.write_record(
            std::iter::once(CELL_INDEX_LABEL).chain(self.column_names.iter().map(String::as_str)),
        )?;
        for (cell_id, row) in self.cell_ids.iter().zip(&self.rows) {
            writer.write_record(std::iter::once(cell_id).chain(row))?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Header of the identifier column in the source file.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Annotation column names.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Cell IDs in row order.
    pub fn cell_ids(&self) -> &[String] {
        &self.cell_ids
    }

    /// Number of rows (cells).
    pub fn n_cells(&self) -> usize {
        self.cell_ids.len()
    }

    /// Number of annotation columns.
    pub fn n_columns(&self) -> usize {
        self.column_names.len()
    }

    /// Value at (row, column).
    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// All values of one annotation column, in row order.
    pub fn column(&self, column: usize) -> Result<Vec<&str>> {
        if column >= self.n_columns() {
            return Err(SplitError::MissingColumn {
                index: column,
                n_columns: self.n_columns(),
            });
        }
        Ok(self.rows.iter().map(|r| r[column].as_str()).collect())
    }

    /// Sorted distinct values of one annotation column.
    pub fn levels(&self, column: usize) -> Result<Vec<String>> {
        let levels: BTreeSet<&str> = self.column(column)?.into_iter().collect();
        Ok(levels.into_iter().map(String::from).collect())
    }

    /// Map from cell ID to row index.
    pub fn cell_index(&self) -> HashMap<&str, usize> {
        self.cell_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect()
    }

    /// Subset to the given rows (by index), in the given order.
    pub fn subset_rows(&self, indices: &[usize]) -> Result<Self> {
        let mut cell_ids = Vec::with_capacity(indices.len());
        let mut rows = Vec::with_capacity(indices.len());
        for &idx in indices {
            if idx >= self.n_cells() {
                return Err(SplitError::InvalidParameter(format!(
                    "Row index {} out of bounds",
                    idx
                )));
            }
            cell_ids.push(self.cell_ids[idx].clone());
            rows.push(self.rows[idx].clone());
        }

        Ok(Self {
            index_name: self.index_name.clone(),
            column_names: self.column_names.clone(),
            cell_ids,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "cell_id;batch;type").unwrap();
        writeln!(file, "c1;b1;T cell").unwrap();
        writeln!(file, "c2;b1;B cell").unwrap();
        writeln!(file, "c3;b2;T cell").unwrap();
        writeln!(file, "c4;b2;Unclassified").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_labels() {
        let file = create_test_file();
        let labels = LabelTable::from_csv(file.path(), b';').unwrap();

        assert_eq!(labels.index_name(), "cell_id");
        assert_eq!(labels.n_cells(), 4);
        assert_eq!(labels.n_columns(), 2);
        assert_eq!(labels.cell_ids(), &["c1", "c2", "c3", "c4"]);
        assert_eq!(labels.column_names(), &["batch", "type"]);
        assert_eq!(labels.get(1, 1), Some("B cell"));
    }

    #[test]
    fn test_column_and_levels() {
        let file = create_test_file();
        let labels = LabelTable::from_csv(file.path(), b';').unwrap();

        assert_eq!(
            labels.column(1).unwrap(),
            vec!["T cell", "B cell", "T cell", "Unclassified"]
        );
        assert_eq!(
            labels.levels(1).unwrap(),
            vec!["B cell", "T cell", "Unclassified"]
        );
    }

    #[test]
    fn test_missing_column() {
        let file = create_test_file();
        let labels = LabelTable::from_csv(file.path(), b';').unwrap();

        let err = labels.column(9).unwrap_err();
        assert!(matches!(
            err,
            SplitError::MissingColumn {
                index: 9,
                n_columns: 2
            }
        ));
    }

    #[test]
    fn test_duplicate_ids() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id;type").unwrap();
        writeln!(file, "c1;A").unwrap();
        writeln!(file, "c1;B").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            LabelTable::from_csv(file.path(), b';'),
            Err(SplitError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_subset_rows() {
        let file = create_test_file();
        let labels = LabelTable::from_csv(file.path(), b';').unwrap();

        let subset = labels.subset_rows(&[2, 0]).unwrap();
        assert_eq!(subset.cell_ids(), &["c3", "c1"]);
        assert_eq!(subset.get(0, 0), Some("b2"));
        assert!(labels.subset_rows(&[10]).is_err());
    }

    #[test]
    fn test_to_csv_uses_cell_header_and_quotes() {
        let labels = LabelTable::new(
            "id",
            vec!["type".to_string(), "note".to_string()],
            vec!["c1".to_string()],
            vec![vec!["T cell".to_string(), "a,b".to_string()]],
        )
        .unwrap();

        let file = NamedTempFile::new().unwrap();
        labels.to_csv(file.path(), b',').unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, "cell,type,note\nc1,T cell,\"a,b\"\n");
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let result = LabelTable::new(
            "id",
            vec!["type".to_string()],
            vec!["c1".to_string()],
            vec![vec!["A".to_string(), "extra".to_string()]],
        );
        assert!(matches!(result, Err(SplitError::DimensionMismatch { .. })));
    }
}
