/// Inventory pipeline: discover volumes, discover disks, correlate.
///
/// The phases run sequentially on the calling thread. Both discovery
/// results are fully materialised before correlation starts, and are
/// moved into it.
use crate::correlate::correlate_with_orphans;
use crate::model::{DiskOrdinal, Inventory};
use crate::platform::{ScanLimits, StorageProbe, SystemProbe};
use tracing::info;

/// The inventory together with what was left out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryReport {
    pub inventory: Inventory,
    /// Volumes skipped because the volume limit was reached.
    pub truncated_volumes: usize,
    /// Volumes discovered but not backed by any disk in the inventory.
    pub orphaned_volumes: usize,
    /// The subset of `orphaned_volumes` with no disk extent at all.
    pub unmapped_volumes: usize,
    /// Disk ordinals that exist but could not be opened.
    pub inaccessible_disks: Vec<DiskOrdinal>,
}

/// Run a full inventory pass against `probe`.
pub fn build_inventory<P: StorageProbe + ?Sized>(probe: &P, limits: &ScanLimits) -> InventoryReport {
    let volumes = probe.discover_volumes(limits);
    let disks = probe.discover_disks(limits);

    let correlation = correlate_with_orphans(volumes.volumes, disks.disks);
    let unmapped = correlation.orphans.iter().filter(|v| v.is_unmapped()).count();
    for orphan in &correlation.orphans {
        if let Some(ordinal) = orphan.backing_disk_index {
            tracing::debug!(
                "{} is on disk {ordinal}, which was not opened, left out",
                orphan.device_path
            );
        }
    }
    if unmapped > 0 {
        tracing::debug!("{unmapped} volume(s) have no disk extent and were left out");
    }

    let report = InventoryReport {
        truncated_volumes: volumes.truncated,
        orphaned_volumes: correlation.orphans.len(),
        unmapped_volumes: unmapped,
        inaccessible_disks: disks.inaccessible,
        inventory: correlation.inventory,
    };

    info!(
        "Inventory complete: {} disk(s), {} volume(s) attached, {} left out",
        report.inventory.len(),
        report.inventory.volume_count(),
        report.orphaned_volumes
    );
    report
}

/// Inventory the local machine with the default limits.
pub fn scan_system() -> InventoryReport {
    build_inventory(&SystemProbe, &ScanLimits::default())
}
