/// Physical disk enumeration by ordinal (`\\.\PhysicalDrive<N>`).
///
/// Each ordinal in the scan range is opened in turn. A disk that opens
/// is queried for its identity (storage device descriptor) and raw size
/// (drive geometry); the handle is closed before the next ordinal is
/// tried. Ordinals that do not open are skipped.
use super::decode;
use super::handle::DeviceHandle;
use super::{DiskDiscovery, ScanLimits};
use crate::model::{Disk, DiskOrdinal};
use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_PATH_NOT_FOUND};
use windows::Win32::System::Ioctl::{IOCTL_DISK_GET_DRIVE_GEOMETRY_EX, IOCTL_STORAGE_QUERY_PROPERTY};

/// STORAGE_PROPERTY_QUERY { PropertyId: StorageDeviceProperty (0),
/// QueryType: PropertyStandardQuery (0), AdditionalParameters: [0] }, padded.
const STANDARD_DEVICE_QUERY: [u8; 12] = [0; 12];

/// Enumerate physical disks `0..limits.max_disk_ordinal`.
pub fn enumerate_disks(limits: &ScanLimits) -> DiskDiscovery {
    let mut discovery = DiskDiscovery::default();

    for n in 0..limits.max_disk_ordinal {
        let ordinal = DiskOrdinal(n);
        let path = format!(r"\\.\{}", ordinal.physical_name());

        let handle = match DeviceHandle::open_for_read(&path) {
            Ok(h) => h,
            Err(e) => {
                let code = e.code();
                if code != ERROR_FILE_NOT_FOUND.to_hresult()
                    && code != ERROR_PATH_NOT_FOUND.to_hresult()
                {
                    tracing::warn!("{path} exists but cannot be opened: {e}");
                    discovery.inaccessible.push(ordinal);
                }
                continue;
            }
        };

        discovery.disks.push(query_disk(ordinal, &handle));
        // `handle` is dropped (closed) here, before the next ordinal.
    }

    tracing::info!(
        "Discovered {} physical disk(s), {} inaccessible",
        discovery.disks.len(),
        discovery.inaccessible.len()
    );
    discovery
}

fn query_disk(ordinal: DiskOrdinal, handle: &DeviceHandle) -> Disk {
    let mut disk = Disk::new(ordinal);

    let mut out = [0u8; 2048];
    match handle.ioctl(IOCTL_STORAGE_QUERY_PROPERTY, Some(&STANDARD_DEVICE_QUERY), &mut out) {
        Ok(bytes) => match decode::device_identity(bytes) {
            Ok(id) => {
                disk.vendor = id.vendor;
                disk.model = id.model;
                disk.serial_number = id.serial_number;
                disk.protocol = id.protocol;
            }
            Err(e) => tracing::debug!("{}: {e}", handle.path()),
        },
        Err(e) => tracing::debug!("{}: storage property query failed: {e}", handle.path()),
    }

    let mut geometry = [0u8; 256];
    match handle.ioctl(IOCTL_DISK_GET_DRIVE_GEOMETRY_EX, None, &mut geometry) {
        Ok(bytes) => match decode::disk_size(bytes) {
            Ok(size) => disk.total_bytes = size,
            Err(e) => tracing::debug!("{}: {e}", handle.path()),
        },
        Err(e) => tracing::debug!("{}: drive geometry query failed: {e}", handle.path()),
    }

    disk
}
