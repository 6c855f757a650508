/// Serialisable views of the inventory.
///
/// These borrow from the [`Inventory`] and add the derived GB figures.
/// Field names are the export's public keys; absent text is `""` and
/// absent numbers are `0`, so every key is always present.
use crate::model::size::bytes_to_gb;
use crate::model::{Disk, Inventory, Volume};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct InventoryDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub disks: Vec<DiskRecord<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiskRecord<'a> {
    pub name: &'a str,
    pub vendor: &'a str,
    pub model: &'a str,
    pub serial: &'a str,
    pub protocol: &'static str,
    pub size_bytes: u64,
    pub size_gb: f64,
    pub free_bytes: u64,
    pub free_gb: f64,
    /// Combined capacity of the attached volumes.
    pub volumes_size_bytes: u64,
    pub volumes_size_gb: f64,
    pub volumes: Vec<VolumeRecord<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolumeRecord<'a> {
    pub letter: &'a str,
    pub label: &'a str,
    pub filesystem: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub device_path: &'a str,
    pub size_bytes: u64,
    pub size_gb: f64,
    pub free_bytes: u64,
    pub free_gb: f64,
    pub offset: u64,
    pub length: u64,
}

impl<'a> InventoryDocument<'a> {
    pub fn new(inventory: &'a Inventory, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            disks: inventory.disks.iter().map(DiskRecord::from).collect(),
        }
    }
}

impl<'a> From<&'a Disk> for DiskRecord<'a> {
    fn from(d: &'a Disk) -> Self {
        let volumes_size = d.volume_total_bytes();
        Self {
            name: &d.physical_name,
            vendor: &d.vendor,
            model: &d.model,
            serial: &d.serial_number,
            protocol: d.protocol.label(),
            size_bytes: d.total_bytes,
            size_gb: bytes_to_gb(d.total_bytes),
            free_bytes: d.free_bytes,
            free_gb: bytes_to_gb(d.free_bytes),
            volumes_size_bytes: volumes_size,
            volumes_size_gb: bytes_to_gb(volumes_size),
            volumes: d.volumes.iter().map(VolumeRecord::from).collect(),
        }
    }
}

impl<'a> From<&'a Volume> for VolumeRecord<'a> {
    fn from(v: &'a Volume) -> Self {
        Self {
            letter: &v.mount_point,
            label: &v.label,
            filesystem: &v.filesystem_name,
            kind: v.kind.label(),
            device_path: &v.device_path,
            size_bytes: v.total_bytes,
            size_gb: bytes_to_gb(v.total_bytes),
            free_bytes: v.free_bytes,
            free_gb: bytes_to_gb(v.free_bytes),
            offset: v.offset_bytes,
            length: v.length_bytes,
        }
    }
}
