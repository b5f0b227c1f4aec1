//! Built-in flow dataset catalog
//!
//! The four flow matrices of the polluters index: who finances production,
//! who invests in it, where the plastic is produced, and where the waste
//! ends up. Each entry carries the semantic row/column roles and the
//! interactive defaults (top-N 10, per-dataset threshold) inherited from
//! the published figures.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier for a built-in dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetId {
    Investor,
    Financing,
    Production,
    Waste,
}

impl DatasetId {
    /// All built-in datasets, in display order.
    pub const ALL: [DatasetId; 4] = [
        DatasetId::Investor,
        DatasetId::Financing,
        DatasetId::Production,
        DatasetId::Waste,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetId::Investor => "investor",
            DatasetId::Financing => "financing",
            DatasetId::Production => "production",
            DatasetId::Waste => "waste",
        }
    }

    /// Catalog entry for this dataset.
    pub fn spec(&self) -> &'static DatasetSpec {
        &CATALOG[*self as usize]
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatasetId {
    type Err = UnknownDataset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "investor" => Ok(DatasetId::Investor),
            "financing" => Ok(DatasetId::Financing),
            "production" => Ok(DatasetId::Production),
            "waste" => Ok(DatasetId::Waste),
            other => Err(UnknownDataset(other.to_string())),
        }
    }
}

/// Parse error for dataset identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dataset '{0}' (expected one of: investor, financing, production, waste)")]
pub struct UnknownDataset(pub String);

/// Static description of one flow dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSpec {
    /// Identifier
    pub id: DatasetId,
    /// Diagram title handed to the renderer
    pub title: &'static str,
    /// What a row label means
    pub source_role: &'static str,
    /// What a column label means
    pub target_role: &'static str,
    /// CSV file name under the data directory
    pub file_name: &'static str,
    /// Default minimum-value threshold for this dataset
    pub default_min_value: f64,
    /// Default top-N limit applied to both sources and targets
    pub default_top_n: usize,
}

/// The built-in catalog. Order matches [`DatasetId::ALL`].
pub const CATALOG: [DatasetSpec; 4] = [
    DatasetSpec {
        id: DatasetId::Investor,
        title: "Investor to Producer",
        source_role: "Ultimate Investor",
        target_role: "Producer",
        file_name: "investor_matrix.csv",
        default_min_value: 100.0,
        default_top_n: 10,
    },
    DatasetSpec {
        id: DatasetId::Financing,
        title: "Financer to Producer",
        source_role: "Bank",
        target_role: "Producer",
        file_name: "financing_matrix.csv",
        default_min_value: 500.0,
        default_top_n: 10,
    },
    DatasetSpec {
        id: DatasetId::Production,
        title: "Producer to Country of Production",
        source_role: "Producer",
        target_role: "Country of Production",
        file_name: "production_matrix.csv",
        default_min_value: 1500.0,
        default_top_n: 10,
    },
    DatasetSpec {
        id: DatasetId::Waste,
        title: "Country of Production to Country of Impact",
        source_role: "Country of Production",
        target_role: "Country of Impact",
        file_name: "waste_matrix.csv",
        default_min_value: 1000.0,
        default_top_n: 10,
    },
];
