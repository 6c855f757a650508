/// Flat CSV export: one row per attached volume.
///
/// Each row repeats its disk's identity columns. A disk with no volumes
/// still gets one row, with empty volume columns, so every disk in the
/// inventory shows up in the table.
use super::{ensure_parent, ExportError};
use crate::model::size::bytes_to_gb;
use crate::model::{Disk, Inventory, Volume};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct TableRow<'a> {
    pub disk: &'a str,
    pub vendor: &'a str,
    pub model: &'a str,
    pub serial: &'a str,
    pub protocol: &'static str,
    pub disk_size_bytes: u64,
    pub disk_size_gb: f64,
    pub disk_free_bytes: u64,
    pub disk_free_gb: f64,
    pub disk_volumes_size_bytes: u64,
    pub disk_volumes_size_gb: f64,
    pub letter: &'a str,
    pub label: &'a str,
    pub filesystem: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub size_bytes: u64,
    pub size_gb: f64,
    pub free_bytes: u64,
    pub free_gb: f64,
    pub offset: u64,
    pub length: u64,
}

impl<'a> TableRow<'a> {
    fn new(d: &'a Disk, v: Option<&'a Volume>) -> Self {
        let volumes_size = d.volume_total_bytes();
        let size = v.map_or(0, |v| v.total_bytes);
        let free = v.map_or(0, |v| v.free_bytes);
        Self {
            disk: &d.physical_name,
            vendor: &d.vendor,
            model: &d.model,
            serial: &d.serial_number,
            protocol: d.protocol.label(),
            disk_size_bytes: d.total_bytes,
            disk_size_gb: bytes_to_gb(d.total_bytes),
            disk_free_bytes: d.free_bytes,
            disk_free_gb: bytes_to_gb(d.free_bytes),
            disk_volumes_size_bytes: volumes_size,
            disk_volumes_size_gb: bytes_to_gb(volumes_size),
            letter: v.map_or("", |v| v.mount_point.as_str()),
            label: v.map_or("", |v| v.label.as_str()),
            filesystem: v.map_or("", |v| v.filesystem_name.as_str()),
            kind: v.map_or("", |v| v.kind.label()),
            size_bytes: size,
            size_gb: bytes_to_gb(size),
            free_bytes: free,
            free_gb: bytes_to_gb(free),
            offset: v.map_or(0, |v| v.offset_bytes),
            length: v.map_or(0, |v| v.length_bytes),
        }
    }
}

/// Flatten the inventory into rows, in disk then volume order.
pub fn rows(inventory: &Inventory) -> Vec<TableRow<'_>> {
    let mut out = Vec::with_capacity(inventory.volume_count() + inventory.len());
    for d in &inventory.disks {
        if d.volumes.is_empty() {
            out.push(TableRow::new(d, None));
        } else {
            out.extend(d.volumes.iter().map(|v| TableRow::new(d, Some(v))));
        }
    }
    out
}

/// Write the rows as CSV with a header line to any writer.
pub fn write_csv_to<W: Write>(inventory: &Inventory, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows(inventory) {
        csv_writer.serialize(row)?;
    }
    csv_writer
        .flush()
        .map_err(|e| ExportError::Csv(csv::Error::from(e)))
}

/// Write the CSV export to `path`, creating the parent directory.
pub fn write_csv(inventory: &Inventory, path: &Path) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let file = std::fs::File::create(path).map_err(|e| ExportError::io(path, e))?;
    write_csv_to(inventory, file)
}
