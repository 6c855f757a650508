/// Export: renders an [`Inventory`] for files and the console.
///
/// Every renderer takes the inventory by shared reference and walks it
/// in order; nothing here reorders or modifies disks or volumes.
///
/// - [`json`]: the primary artifact, nested disks → volumes.
/// - [`table`]: flat CSV, one row per volume.
/// - [`summary`]: human-readable text report.
pub mod json;
pub mod records;
pub mod summary;
pub mod table;

use crate::model::Inventory;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use json::{render_json, write_json};
pub use records::{DiskRecord, InventoryDocument, VolumeRecord};
pub use summary::render_summary;
pub use table::{write_csv, TableRow};

/// Where the JSON inventory is written, relative to the working directory.
pub const DEFAULT_JSON_PATH: &str = "output/disk_info.json";

/// Where the CSV inventory is written, relative to the working directory.
pub const DEFAULT_CSV_PATH: &str = "output/disk_info.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON serialisation failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialisation failed: {0}")]
    Csv(#[from] csv::Error),
}

impl ExportError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Create the parent directory of `path` if it has one.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))
        }
        _ => Ok(()),
    }
}

/// Write the JSON export, reporting only whether it succeeded.
///
/// A failure is logged and leaves `inventory` untouched.
pub fn export_inventory(inventory: &Inventory, path: &Path) -> bool {
    match write_json(inventory, path) {
        Ok(()) => {
            tracing::info!("Inventory written to {}", path.display());
            true
        }
        Err(e) => {
            tracing::warn!("Export failed: {e}");
            false
        }
    }
}
