/// Volume enumeration using the Windows API.
///
/// Walks every volume GUID path (`\\?\Volume{...}\`), including volumes
/// with no drive letter, and records its mount point, label, filesystem,
/// capacity, and the physical disk holding its first extent.
///
/// Each property is queried independently. A failed query leaves that
/// field at its zero value and the volume is still recorded.
use super::decode;
use super::handle::{from_wide, wide, DeviceHandle};
use super::{ScanLimits, VolumeDiscovery};
use crate::model::Volume;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{ERROR_MORE_DATA, HANDLE};
use windows::Win32::Storage::FileSystem::{
    FindFirstVolumeW, FindNextVolumeW, FindVolumeClose, GetDiskFreeSpaceExW,
    GetVolumeInformationW, GetVolumePathNamesForVolumeNameW,
};
use windows::Win32::System::Ioctl::IOCTL_VOLUME_GET_VOLUME_DISK_EXTENTS;

const VOLUME_NAME_LEN: usize = 260;
// Initial mount point list size; grown on ERROR_MORE_DATA.
const MOUNT_POINTS_LEN: usize = 1024;

/// Search handle from `FindFirstVolumeW`, closed on drop.
struct VolumeSearch(HANDLE);

impl Drop for VolumeSearch {
    fn drop(&mut self) {
        unsafe {
            let _ = FindVolumeClose(self.0);
        }
    }
}

/// Enumerate all volumes on the system, up to `limits.max_volumes`.
///
/// Returns an empty discovery if volume enumeration itself cannot start.
pub fn enumerate_volumes(limits: &ScanLimits) -> VolumeDiscovery {
    let mut discovery = VolumeDiscovery::default();
    let mut name_buf = [0u16; VOLUME_NAME_LEN];

    let search = match unsafe { FindFirstVolumeW(&mut name_buf) } {
        Ok(h) => VolumeSearch(h),
        Err(e) => {
            tracing::warn!("FindFirstVolumeW failed: {e}");
            return discovery;
        }
    };

    loop {
        let device_path = from_wide(&name_buf);
        if discovery.volumes.len() < limits.max_volumes {
            discovery.volumes.push(query_volume(&device_path));
        } else {
            discovery.truncated += 1;
        }

        if unsafe { FindNextVolumeW(search.0, &mut name_buf) }.is_err() {
            break; // ERROR_NO_MORE_FILES
        }
    }

    if discovery.truncated > 0 {
        tracing::warn!(
            "Volume limit of {} reached, {} volume(s) skipped",
            limits.max_volumes,
            discovery.truncated
        );
    }
    tracing::info!("Discovered {} volume(s)", discovery.volumes.len());
    discovery
}

/// Build a volume record from its GUID path (with trailing backslash).
fn query_volume(device_path: &str) -> Volume {
    let mount_point = first_mount_point(device_path).unwrap_or_default();
    let mut volume = Volume::new(device_path, mount_point);

    if let Some((label, filesystem)) = volume_information(device_path) {
        volume.label = label;
        volume.filesystem_name = filesystem;
    }

    if let Some((total, free)) = free_space(device_path) {
        volume = volume.with_capacity(total, free);
    }

    match first_extent(device_path) {
        Some(ext) => {
            if ext.extent_count > 1 {
                tracing::debug!(
                    "{device_path} spans {} extents; attributing it to disk {} only",
                    ext.extent_count,
                    ext.disk
                );
            }
            volume = volume.with_extent(ext.disk, ext.offset_bytes, ext.length_bytes);
        }
        None => tracing::debug!("{device_path}: no disk extent, volume is unmapped"),
    }

    volume
}

/// First mount point of the volume, with `/` separators (e.g. `C:/`).
fn first_mount_point(device_path: &str) -> Option<String> {
    let path_wide = wide(device_path);

    let names = decode::fill_growing(MOUNT_POINTS_LEN, |buf| {
        let mut returned: u32 = 0;
        let result = unsafe {
            GetVolumePathNamesForVolumeNameW(PCWSTR(path_wide.as_ptr()), Some(buf), &mut returned)
        };
        match result {
            Ok(()) => decode::Fill::Done,
            Err(e) if e.code() == ERROR_MORE_DATA.to_hresult() => {
                decode::Fill::TooSmall(returned as usize)
            }
            Err(e) => {
                tracing::debug!("{device_path}: GetVolumePathNamesForVolumeNameW failed: {e}");
                decode::Fill::Failed
            }
        }
    })?;

    decode::first_mount_point(&names)
}

/// Volume label and filesystem name.
fn volume_information(device_path: &str) -> Option<(String, String)> {
    let path_wide = wide(device_path);
    let mut label_buf = [0u16; 256];
    let mut fs_buf = [0u16; 256];

    let ok = unsafe {
        GetVolumeInformationW(
            PCWSTR(path_wide.as_ptr()),
            Some(&mut label_buf),
            None,
            None,
            None,
            Some(&mut fs_buf),
        )
        .is_ok()
    };
    if !ok {
        tracing::debug!("{device_path}: GetVolumeInformationW failed");
        return None;
    }
    Some((from_wide(&label_buf), from_wide(&fs_buf)))
}

/// Total and caller-available free bytes.
///
/// Queried through the GUID path so unmounted volumes are covered too.
fn free_space(device_path: &str) -> Option<(u64, u64)> {
    let path_wide = wide(device_path);
    let mut free_caller: u64 = 0;
    let mut total: u64 = 0;
    let mut free_total: u64 = 0;

    let ok = unsafe {
        GetDiskFreeSpaceExW(
            PCWSTR(path_wide.as_ptr()),
            Some(&mut free_caller as *mut u64),
            Some(&mut total as *mut u64),
            Some(&mut free_total as *mut u64),
        )
        .is_ok()
    };
    if !ok {
        tracing::debug!("{device_path}: GetDiskFreeSpaceExW failed");
        return None;
    }
    Some((total, free_caller))
}

/// First disk extent of the volume.
///
/// The device must be opened without the trailing backslash, otherwise
/// `CreateFileW` opens the volume's root directory instead.
fn first_extent(device_path: &str) -> Option<decode::FirstExtent> {
    let device = device_path.trim_end_matches('\\');
    let handle = match DeviceHandle::open_for_query(device) {
        Ok(h) => h,
        Err(e) => {
            tracing::debug!("{device}: cannot open volume: {e}");
            return None;
        }
    };

    let mut out = [0u8; 1024];
    let bytes = match handle.ioctl(IOCTL_VOLUME_GET_VOLUME_DISK_EXTENTS, None, &mut out) {
        Ok(bytes) => bytes,
        Err(e) => {
            // Optical, network, and locked volumes land here.
            tracing::debug!("{}: disk extents query failed: {e}", handle.path());
            return None;
        }
    };

    match decode::first_extent(bytes) {
        Ok(ext) => ext,
        Err(e) => {
            tracing::debug!("{}: {e}", handle.path());
            None
        }
    }
}
