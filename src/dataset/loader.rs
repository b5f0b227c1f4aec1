//! CSV matrix ingestion
//!
//! A matrix file is a rectangular CSV: the first header cell names the
//! source column, the remaining header cells are target labels, and each
//! record is one source row. Cells that are empty or unparseable are
//! treated as absent; the matrix itself rejects negative and non-finite
//! weights. Duplicate source rows are merged by cell-wise summation.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use tributary_sankey::FlowMatrix;

use super::catalog::UnknownDataset;

/// Errors from loading a dataset matrix.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("matrix file {path} has no data rows or no target columns")]
    EmptyMatrix { path: PathBuf },

    #[error(transparent)]
    UnknownDataset(#[from] UnknownDataset),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// Load a flow matrix from a CSV file.
pub fn load_matrix(path: &Path) -> DatasetResult<FlowMatrix> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    let targets: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    if targets.is_empty() {
        return Err(DatasetError::EmptyMatrix {
            path: path.to_path_buf(),
        });
    }

    let mut matrix = FlowMatrix::new();
    let mut skipped_cells = 0usize;
    for record in reader.records() {
        let record = record?;
        let Some(source) = record.get(0) else {
            continue;
        };
        let source = source.trim();
        if source.is_empty() {
            continue;
        }
        matrix.touch_row(source);
        for (target, cell) in targets.iter().zip(record.iter().skip(1)) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(weight) => matrix.add(source, target.clone(), weight),
                Err(_) => skipped_cells += 1,
            }
        }
    }

    if matrix.is_empty() {
        return Err(DatasetError::EmptyMatrix {
            path: path.to_path_buf(),
        });
    }
    if skipped_cells > 0 {
        warn!(
            path = %path.display(),
            skipped_cells,
            "skipped unparseable cells while loading matrix"
        );
    }
    debug!(
        path = %path.display(),
        rows = matrix.row_count(),
        columns = matrix.column_count(),
        "loaded flow matrix"
    );

    Ok(matrix)
}
