//! Alignment of the count matrix and label table on shared cell IDs.

use crate::data::{CountMatrix, LabelTable};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Which table's row order the aligned pair follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignOrder {
    /// Keep the label table's row order.
    #[default]
    Labels,
    /// Keep the count matrix's cell order.
    Counts,
}

/// Drop label rows whose value in `column` equals `sentinel` exactly.
///
/// Returns the filtered table and the number of rows removed.
pub fn drop_category(
    labels: &LabelTable,
    column: usize,
    sentinel: &str,
) -> Result<(LabelTable, usize)> {
    let keep: Vec<usize> = labels
        .column(column)?
        .into_iter()
        .enumerate()
        .filter(|(_, label)| *label != sentinel)
        .map(|(i, _)| i)
        .collect();

    let n_dropped = labels.n_cells() - keep.len();
    Ok((labels.subset_rows(&keep)?, n_dropped))
}

/// Reduce both tables to the intersection of their cell IDs.
///
/// After alignment both tables list the same cell IDs in the same order.
pub fn align_tables(
    counts: &CountMatrix,
    labels: &LabelTable,
    order: AlignOrder,
) -> Result<(CountMatrix, LabelTable)> {
    let (count_rows, label_rows): (Vec<usize>, Vec<usize>) = match order {
        AlignOrder::Labels => {
            let count_index = counts.cell_index();
            labels
                .cell_ids()
                .iter()
                .enumerate()
                .filter_map(|(label_row, id)| {
                    count_index
                        .get(id.as_str())
                        .map(|&count_row| (count_row, label_row))
                })
                .unzip()
        }
        AlignOrder::Counts => {
            let label_index = labels.cell_index();
            counts
                .cell_ids()
                .iter()
                .enumerate()
                .filter_map(|(count_row, id)| {
                    label_index
                        .get(id.as_str())
                        .map(|&label_row| (count_row, label_row))
                })
                .unzip()
        }
    };

    Ok((
        counts.subset_cells(&count_rows)?,
        labels.subset_rows(&label_rows)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprs::TriMat;

    fn counts(ids: &[&str]) -> CountMatrix {
        let mut tri_mat = TriMat::new((ids.len(), 1));
        for i in 0..ids.len() {
            tri_mat.add_triplet(i, 0, (i + 1) as f64);
        }
        CountMatrix::new(
            tri_mat.to_csr(),
            ids.iter().map(|s| s.to_string()).collect(),
            vec!["gene".to_string()],
        )
        .unwrap()
    }

    fn labels(rows: &[(&str, &str)]) -> LabelTable {
        LabelTable::new(
            "id",
            vec!["type".to_string()],
            rows.iter().map(|(id, _)| id.to_string()).collect(),
            rows.iter().map(|(_, t)| vec![t.to_string()]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_drop_category() {
        let table = labels(&[("c1", "A"), ("c2", "Unclassified"), ("c3", "B")]);
        let (kept, n_dropped) = drop_category(&table, 0, "Unclassified").unwrap();

        assert_eq!(n_dropped, 1);
        assert_eq!(kept.cell_ids(), &["c1", "c3"]);
    }

    #[test]
    fn test_drop_category_exact_match() {
        let table = labels(&[("c1", "unclassified"), ("c2", "Unclassified ")]);
        let (kept, n_dropped) = drop_category(&table, 0, "Unclassified").unwrap();

        assert_eq!(n_dropped, 0);
        assert_eq!(kept.n_cells(), 2);
    }

    #[test]
    fn test_drop_category_bad_column() {
        let table = labels(&[("c1", "A")]);
        assert!(drop_category(&table, 9, "Unclassified").is_err());
    }

    #[test]
    fn test_align_follows_label_order() {
        let mat = counts(&["c1", "c2", "c3", "c4"]);
        let table = labels(&[("c3", "A"), ("c9", "A"), ("c1", "B")]);

        let (mat, table) = align_tables(&mat, &table, AlignOrder::Labels).unwrap();
        assert_eq!(mat.cell_ids(), &["c3", "c1"]);
        assert_eq!(table.cell_ids(), &["c3", "c1"]);
        assert_eq!(mat.get(0, 0), 3.0);
        assert_eq!(mat.get(1, 0), 1.0);
    }

    #[test]
    fn test_align_follows_count_order() {
        let mat = counts(&["c1", "c2", "c3", "c4"]);
        let table = labels(&[("c3", "A"), ("c9", "A"), ("c1", "B")]);

        let (mat, table) = align_tables(&mat, &table, AlignOrder::Counts).unwrap();
        assert_eq!(mat.cell_ids(), &["c1", "c3"]);
        assert_eq!(table.cell_ids(), &["c1", "c3"]);
        assert_eq!(table.get(0, 0), Some("B"));
    }

    #[test]
    fn test_align_disjoint_ids() {
        let mat = counts(&["c1"]);
        let table = labels(&[("x1", "A")]);

        let (mat, table) = align_tables(&mat, &table, AlignOrder::Labels).unwrap();
        assert_eq!(mat.n_cells(), 0);
        assert_eq!(table.n_cells(), 0);
    }
}
