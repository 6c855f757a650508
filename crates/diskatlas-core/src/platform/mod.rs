/// Platform-specific functionality: volume and physical-disk discovery.
///
/// Discovery talks to the Windows storage stack and is only compiled on
/// Windows. Buffer decoding and the probe seam are platform-neutral;
/// other targets get a probe that discovers nothing.
pub mod decode;

#[cfg(windows)]
pub mod disks;
#[cfg(windows)]
mod handle;
#[cfg(windows)]
pub mod permissions;
#[cfg(windows)]
pub mod volumes;

use crate::model::{Disk, DiskOrdinal, Volume};

/// Maximum number of volumes recorded per discovery pass.
pub const DEFAULT_MAX_VOLUMES: usize = 64;

/// Exclusive upper bound of the physical-disk ordinals probed.
pub const DEFAULT_MAX_DISK_ORDINAL: u32 = 25;

/// Bounds applied to a discovery pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Volumes beyond this count are skipped and counted in
    /// [`VolumeDiscovery::truncated`].
    pub max_volumes: usize,
    /// Disks `PhysicalDrive0 .. PhysicalDrive{max_disk_ordinal - 1}` are probed.
    pub max_disk_ordinal: u32,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_volumes: DEFAULT_MAX_VOLUMES,
            max_disk_ordinal: DEFAULT_MAX_DISK_ORDINAL,
        }
    }
}

/// Volumes found by one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeDiscovery {
    /// Volumes in enumeration order, at most `max_volumes` of them.
    pub volumes: Vec<Volume>,
    /// Number of volumes skipped after the limit was reached.
    pub truncated: usize,
}

/// Physical disks found by one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskDiscovery {
    /// Disks that opened successfully, in ordinal order, with no volumes yet.
    pub disks: Vec<Disk>,
    /// Ordinals that exist but could not be opened (e.g. access denied).
    /// These never appear in the inventory.
    pub inaccessible: Vec<DiskOrdinal>,
}

/// Source of raw volume and disk records.
///
/// The two methods are independent; neither sees the other's output.
pub trait StorageProbe {
    fn discover_volumes(&self, limits: &ScanLimits) -> VolumeDiscovery;
    fn discover_disks(&self, limits: &ScanLimits) -> DiskDiscovery;
}

/// Probe backed by the Windows storage stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

#[cfg(windows)]
impl StorageProbe for SystemProbe {
    fn discover_volumes(&self, limits: &ScanLimits) -> VolumeDiscovery {
        volumes::enumerate_volumes(limits)
    }

    fn discover_disks(&self, limits: &ScanLimits) -> DiskDiscovery {
        if !permissions::is_elevated() {
            tracing::warn!(
                "Not running elevated; physical disks will likely be inaccessible"
            );
        }
        disks::enumerate_disks(limits)
    }
}

#[cfg(not(windows))]
impl StorageProbe for SystemProbe {
    fn discover_volumes(&self, _limits: &ScanLimits) -> VolumeDiscovery {
        tracing::warn!("Volume discovery is only supported on Windows");
        VolumeDiscovery::default()
    }

    fn discover_disks(&self, _limits: &ScanLimits) -> DiskDiscovery {
        tracing::warn!("Physical disk discovery is only supported on Windows");
        DiskDiscovery::default()
    }
}
