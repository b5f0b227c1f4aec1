//! Load-once dataset cache
//!
//! Base matrices are loaded from disk on first use and shared read-only
//! across every pipeline run after that; a parameter change never touches
//! disk. Reloads happen only through explicit invalidation, e.g. when the
//! underlying files were replaced.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tributary_sankey::FlowMatrix;

use super::catalog::DatasetId;
use super::loader::{load_matrix, DatasetResult};

/// Explicit cache around the dataset directory.
///
/// Matrices are handed out as `Arc<FlowMatrix>` and never mutated; the lock
/// only guards the map of loaded entries, not the matrices themselves.
pub struct DatasetCache {
    data_dir: PathBuf,
    loaded: RwLock<HashMap<DatasetId, Arc<FlowMatrix>>>,
}

impl DatasetCache {
    /// Create a cache over `data_dir`. Nothing is loaded yet.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        DatasetCache {
            data_dir: data_dir.into(),
            loaded: RwLock::new(HashMap::new()),
        }
    }

    /// Path of the CSV file backing a dataset.
    pub fn path_for(&self, id: DatasetId) -> PathBuf {
        self.data_dir.join(id.spec().file_name)
    }

    /// The configured data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Fetch a matrix, loading it from disk on first access.
    pub async fn get_or_load(&self, id: DatasetId) -> DatasetResult<Arc<FlowMatrix>> {
        {
            let loaded = self.loaded.read().await;
            if let Some(matrix) = loaded.get(&id) {
                return Ok(Arc::clone(matrix));
            }
        }

        let mut loaded = self.loaded.write().await;
        // double-checked: another task may have loaded while we waited
        if let Some(matrix) = loaded.get(&id) {
            return Ok(Arc::clone(matrix));
        }

        let path = self.path_for(id);
        let matrix = Arc::new(load_matrix(&path)?);
        info!(dataset = %id, path = %path.display(), "loaded dataset into cache");
        loaded.insert(id, Arc::clone(&matrix));
        Ok(matrix)
    }

    /// Whether a dataset is currently cached.
    pub async fn is_loaded(&self, id: DatasetId) -> bool {
        self.loaded.read().await.contains_key(&id)
    }

    /// Drop one cached entry. Returns true when something was dropped.
    pub async fn invalidate(&self, id: DatasetId) -> bool {
        let dropped = self.loaded.write().await.remove(&id).is_some();
        if dropped {
            info!(dataset = %id, "invalidated cached dataset");
        }
        dropped
    }

    /// Drop every cached entry. Returns the number of entries dropped.
    pub async fn invalidate_all(&self) -> usize {
        let mut loaded = self.loaded.write().await;
        let count = loaded.len();
        loaded.clear();
        if count > 0 {
            info!(count, "invalidated all cached datasets");
        }
        count
    }
}
