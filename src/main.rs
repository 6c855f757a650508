//! DiskAtlas: physical disk and volume inventory.
//!
//! Thin binary entry point. All logic lives in the `diskatlas-core` crate.

use anyhow::Context;
use diskatlas_core::export::{self, DEFAULT_CSV_PATH, DEFAULT_JSON_PATH};
use diskatlas_core::inventory;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the global log subscriber. `RUST_LOG` overrides the default level.
fn init_logging() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .map_err(anyhow::Error::msg)
        .context("failed to install the log subscriber")
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    tracing::info!("DiskAtlas starting");

    let report = inventory::scan_system();
    if !report.inaccessible_disks.is_empty() {
        tracing::warn!(
            "{} disk(s) could not be opened; run as administrator for a complete inventory",
            report.inaccessible_disks.len()
        );
    }

    print!("{}", export::render_summary(&report.inventory));

    let json_path = Path::new(DEFAULT_JSON_PATH);
    if export::export_inventory(&report.inventory, json_path) {
        println!("Results saved to {}", json_path.display());
    }

    if let Err(e) = export::write_csv(&report.inventory, Path::new(DEFAULT_CSV_PATH)) {
        tracing::warn!("CSV export failed: {e}");
    }

    println!("Scan complete.");
    Ok(())
}
