//! Top-N flow filtering
//!
//! Reduces a matrix to its heaviest columns and rows by aggregate weight.
//! Column selection runs first so that row totals reflect only surviving
//! targets. The kept set is reordered into descending-total order; ties
//! keep their original first-seen order (the sort is stable).

use crate::matrix::FlowMatrix;
use serde::{Deserialize, Serialize};

/// Limits for top-N selection. `None` leaves that dimension unfiltered;
/// a limit larger than the available rows/columns is a no-op for that
/// dimension. `Some(0)` keeps nothing — an empty result is valid output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopNLimits {
    /// Maximum number of source rows to keep
    pub max_sources: Option<usize>,
    /// Maximum number of target columns to keep
    pub max_targets: Option<usize>,
}

impl TopNLimits {
    pub fn new(max_sources: Option<usize>, max_targets: Option<usize>) -> Self {
        TopNLimits {
            max_sources,
            max_targets,
        }
    }

    /// No filtering on either dimension.
    pub fn unbounded() -> Self {
        TopNLimits::default()
    }
}

/// Keep the top `max_targets` columns and then the top `max_sources` rows
/// by total weight. Dropped weight is not redistributed; a row whose every
/// cell belonged to dropped columns survives as an empty row.
pub fn top_n(matrix: &FlowMatrix, limits: &TopNLimits) -> FlowMatrix {
    let column_filtered = match limits.max_targets {
        Some(max_targets) => retain_top_columns(matrix, max_targets),
        None => matrix.clone(),
    };

    match limits.max_sources {
        Some(max_sources) => retain_top_rows(&column_filtered, max_sources),
        None => column_filtered,
    }
}

fn retain_top_columns(matrix: &FlowMatrix, max_targets: usize) -> FlowMatrix {
    let totals = matrix.column_totals();
    let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
    // stable: equal totals keep first-seen column order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let kept: Vec<&str> = ranked.into_iter().take(max_targets).map(|(t, _)| t).collect();

    let mut filtered = FlowMatrix::new();
    for (source, row) in matrix.iter() {
        filtered.touch_row(source.clone());
        for target in &kept {
            if let Some(weight) = row.get(*target) {
                filtered.set(source.clone(), *target, *weight);
            }
        }
    }
    filtered
}

fn retain_top_rows(matrix: &FlowMatrix, max_sources: usize) -> FlowMatrix {
    let mut ranked: Vec<(&str, f64)> = matrix
        .source_labels()
        .into_iter()
        .map(|source| (source, matrix.row_total(source)))
        .collect();
    // stable: equal totals keep row insertion order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut filtered = FlowMatrix::new();
    for (source, _) in ranked.into_iter().take(max_sources) {
        filtered.touch_row(source);
        if let Some(row) = matrix.row(source) {
            for (target, weight) in row {
                filtered.set(source, target.clone(), *weight);
            }
        }
    }
    filtered
}
