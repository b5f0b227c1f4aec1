//! Weighted flow matrix
//!
//! A labelled source x target matrix held as nested ordered maps. Row
//! insertion order and first-seen column order are preserved because both
//! are observable downstream: top-N ties are broken by original order and
//! the edge list follows matrix iteration order.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A weighted adjacency matrix mapping source names to target weights.
///
/// The matrix need not be square and the row/column vocabularies may be
/// disjoint. Every stored weight is finite and non-negative: negative,
/// NaN or infinite values are treated as absent edges and are skipped on
/// insert. A missing cell reads as a zero-weight edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowMatrix {
    rows: IndexMap<String, IndexMap<String, f64>>,
}

/// Summary statistics for a flow matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMatrixStats {
    /// Number of source rows
    pub rows: usize,
    /// Number of distinct target columns
    pub columns: usize,
    /// Number of populated cells
    pub cells: usize,
    /// Sum of all cell weights
    pub total: f64,
    /// Populated cells / possible cells (0.0 for a degenerate matrix)
    pub density: f64,
}

impl FlowMatrix {
    /// Create an empty matrix.
    pub fn new() -> Self {
        FlowMatrix {
            rows: IndexMap::new(),
        }
    }

    /// Ensure a source row exists, without adding any cells.
    ///
    /// Used by ingestion so a row whose every cell was unparseable still
    /// appears (with zero edges) rather than vanishing.
    pub fn touch_row(&mut self, source: impl Into<String>) {
        self.rows.entry(source.into()).or_default();
    }

    /// Set a cell weight, replacing any existing value.
    ///
    /// Negative or non-finite weights are skipped; the cell keeps its
    /// previous value (or stays absent).
    pub fn set(&mut self, source: impl Into<String>, target: impl Into<String>, weight: f64) {
        if !weight.is_finite() || weight < 0.0 {
            return;
        }
        self.rows
            .entry(source.into())
            .or_default()
            .insert(target.into(), weight);
    }

    /// Add to a cell weight, creating the cell if absent.
    ///
    /// This is the aggregation primitive for duplicate source rows on
    /// ingestion: repeated (source, target) pairs sum cell-wise. Invalid
    /// weights are skipped like in [`FlowMatrix::set`].
    pub fn add(&mut self, source: impl Into<String>, target: impl Into<String>, weight: f64) {
        if !weight.is_finite() || weight < 0.0 {
            return;
        }
        *self
            .rows
            .entry(source.into())
            .or_default()
            .entry(target.into())
            .or_insert(0.0) += weight;
    }

    /// Cell weight for (source, target); zero when the cell is absent.
    pub fn get(&self, source: &str, target: &str) -> f64 {
        self.rows
            .get(source)
            .and_then(|row| row.get(target))
            .copied()
            .unwrap_or(0.0)
    }

    /// A single source row, in column insertion order.
    pub fn row(&self, source: &str) -> Option<&IndexMap<String, f64>> {
        self.rows.get(source)
    }

    /// Iterate rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndexMap<String, f64>)> {
        self.rows.iter()
    }

    /// Source labels in row insertion order.
    pub fn source_labels(&self) -> Vec<&str> {
        self.rows.keys().map(String::as_str).collect()
    }

    /// Distinct target labels in first-seen order across all rows.
    pub fn target_labels(&self) -> Vec<&str> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        for row in self.rows.values() {
            for target in row.keys() {
                seen.insert(target.as_str());
            }
        }
        seen.into_iter().collect()
    }

    /// Number of source rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of distinct target columns.
    pub fn column_count(&self) -> usize {
        self.target_labels().len()
    }

    /// Number of populated cells.
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(IndexMap::len).sum()
    }

    /// True when the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the weights in one row; zero for an unknown source.
    pub fn row_total(&self, source: &str) -> f64 {
        self.rows
            .get(source)
            .map(|row| row.values().sum())
            .unwrap_or(0.0)
    }

    /// Per-column totals over all rows, keyed in first-seen column order.
    pub fn column_totals(&self) -> IndexMap<&str, f64> {
        let mut totals: IndexMap<&str, f64> = IndexMap::new();
        for row in self.rows.values() {
            for (target, weight) in row {
                *totals.entry(target.as_str()).or_insert(0.0) += weight;
            }
        }
        totals
    }

    /// Sum of every cell weight in the matrix.
    pub fn grand_total(&self) -> f64 {
        self.rows
            .values()
            .flat_map(|row| row.values())
            .sum()
    }

    /// Summary statistics.
    pub fn stats(&self) -> FlowMatrixStats {
        let rows = self.row_count();
        let columns = self.column_count();
        let cells = self.cell_count();
        let possible = rows * columns;
        let density = if possible == 0 {
            0.0
        } else {
            cells as f64 / possible as f64
        };
        FlowMatrixStats {
            rows,
            columns,
            cells,
            total: self.grand_total(),
            density,
        }
    }
}

impl fmt::Display for FlowMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let targets = self.target_labels();
        writeln!(f, "source\t{}", targets.join("\t"))?;
        for (source, row) in &self.rows {
            let cells: Vec<String> = targets
                .iter()
                .map(|t| format!("{}", row.get(*t).copied().unwrap_or(0.0)))
                .collect();
            writeln!(f, "{}\t{}", source, cells.join("\t"))?;
        }
        Ok(())
    }
}

impl<S, T> FromIterator<(S, Vec<(T, f64)>)> for FlowMatrix
where
    S: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, Vec<(T, f64)>)>>(iter: I) -> Self {
        let mut matrix = FlowMatrix::new();
        for (source, cells) in iter {
            let source = source.into();
            matrix.touch_row(source.clone());
            for (target, weight) in cells {
                matrix.add(source.clone(), target, weight);
            }
        }
        matrix
    }
}
