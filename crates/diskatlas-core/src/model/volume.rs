/// A single discovered storage volume.
///
/// Every field except `device_path` is best-effort: a query that fails
/// during discovery leaves its field at the zero value (empty string or
/// `0`) rather than discarding the record.
use super::disk::DiskOrdinal;

/// Whether the volume was reachable through a mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKind {
    /// Mounted at a drive letter or folder path.
    LogicalVolume,
    /// No mount point could be resolved (recovery, EFI, unformatted, ...).
    Partition,
}

impl VolumeKind {
    /// Classify a volume by its mount point.
    pub fn from_mount_point(mount_point: &str) -> Self {
        if mount_point.is_empty() {
            Self::Partition
        } else {
            Self::LogicalVolume
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::LogicalVolume => "Logical Volume",
            Self::Partition => "Partition",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// Volume GUID path, e.g. `\\?\Volume{...}\`. Stable for one discovery pass only.
    pub device_path: String,
    /// First mount point with forward slashes, e.g. `C:/`. Empty when unmounted.
    pub mount_point: String,
    pub label: String,
    pub filesystem_name: String,
    pub kind: VolumeKind,
    /// Total capacity in bytes.
    pub total_bytes: u64,
    /// Free space in bytes available to the caller.
    pub free_bytes: u64,
    /// Physical disk holding the volume's first extent. `None` when the
    /// extent query failed or reported no extents.
    pub backing_disk_index: Option<DiskOrdinal>,
    /// Byte offset of the first extent on the backing disk.
    pub offset_bytes: u64,
    /// Byte length of the first extent.
    pub length_bytes: u64,
}

impl Volume {
    /// Create an unmapped volume with only its identity filled in.
    ///
    /// The kind is derived from `mount_point`; capacity and extent fields
    /// start at zero and are filled in as the individual queries succeed.
    pub fn new(device_path: impl Into<String>, mount_point: impl Into<String>) -> Self {
        let mount_point = mount_point.into();
        Self {
            device_path: device_path.into(),
            kind: VolumeKind::from_mount_point(&mount_point),
            mount_point,
            label: String::new(),
            filesystem_name: String::new(),
            total_bytes: 0,
            free_bytes: 0,
            backing_disk_index: None,
            offset_bytes: 0,
            length_bytes: 0,
        }
    }

    /// Record the volume's first disk extent.
    pub fn with_extent(mut self, disk: DiskOrdinal, offset_bytes: u64, length_bytes: u64) -> Self {
        self.backing_disk_index = Some(disk);
        self.offset_bytes = offset_bytes;
        self.length_bytes = length_bytes;
        self
    }

    /// Record the volume's capacity.
    pub fn with_capacity(mut self, total_bytes: u64, free_bytes: u64) -> Self {
        self.total_bytes = total_bytes;
        self.free_bytes = free_bytes;
        self
    }

    /// `true` if the volume could not be attributed to any physical disk.
    pub fn is_unmapped(&self) -> bool {
        self.backing_disk_index.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_mount_point() {
        assert_eq!(VolumeKind::from_mount_point("C:/"), VolumeKind::LogicalVolume);
        assert_eq!(VolumeKind::from_mount_point(""), VolumeKind::Partition);
        assert_eq!(Volume::new("\\\\?\\Volume{a}\\", "").kind, VolumeKind::Partition);
    }

    #[test]
    fn test_new_volume_is_unmapped() {
        let v = Volume::new("\\\\?\\Volume{a}\\", "D:/");
        assert!(v.is_unmapped());
        assert_eq!(v.offset_bytes, 0);
        assert_eq!(v.length_bytes, 0);
        assert_eq!(v.total_bytes, 0);
    }

    #[test]
    fn test_with_extent_maps_volume() {
        let v = Volume::new("V", "C:/").with_extent(DiskOrdinal(2), 1_048_576, 4096);
        assert_eq!(v.backing_disk_index, Some(DiskOrdinal(2)));
        assert_eq!(v.offset_bytes, 1_048_576);
        assert_eq!(v.length_bytes, 4096);
        assert!(!v.is_unmapped());
    }
}
