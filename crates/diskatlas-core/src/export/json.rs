/// JSON export: `{ "generated_at": ..., "disks": [ { ..., "volumes": [...] } ] }`.
use super::records::InventoryDocument;
use super::{ensure_parent, ExportError};
use crate::model::Inventory;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Render the inventory as pretty-printed JSON stamped with `generated_at`.
pub fn render_json(inventory: &Inventory, generated_at: DateTime<Utc>) -> Result<String, ExportError> {
    let doc = InventoryDocument::new(inventory, generated_at);
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Write the inventory to `path` as JSON, creating the parent directory.
pub fn write_json(inventory: &Inventory, path: &Path) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let doc = InventoryDocument::new(inventory, Utc::now());
    write_document(&doc, BufWriter::new(file), path)
}

/// Serialise `doc` into `writer`. Failures of the writer itself are
/// reported as I/O errors on `path`, not as serialisation errors.
fn write_document<W: Write>(doc: &InventoryDocument<'_>, mut writer: W, path: &Path) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, doc).map_err(|e| {
        if e.is_io() {
            ExportError::io(path, io::Error::from(e))
        } else {
            ExportError::Json(e)
        }
    })?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| ExportError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BusProtocol, Disk, DiskOrdinal, Volume};
    use chrono::TimeZone;
    use serde_json::Value;

    fn sample() -> Inventory {
        let mut disk = Disk::new(DiskOrdinal(0));
        disk.vendor = "Samsung".into();
        disk.model = "Samsung SSD 980 1TB".into();
        disk.serial_number = "S64ANS0T".into();
        disk.protocol = BusProtocol::Nvme;
        disk.total_bytes = 1_000_204_886_016;
        let mut c = Volume::new("\\\\?\\Volume{c}\\", "C:/")
            .with_capacity(536_870_912_000, 107_374_182_400)
            .with_extent(DiskOrdinal(0), 290_455_552, 536_870_912_000);
        c.label = "Windows".into();
        c.filesystem_name = "NTFS".into();
        let recovery = Volume::new("\\\\?\\Volume{r}\\", "")
            .with_extent(DiskOrdinal(0), 1_048_576, 524_288_000);
        disk.free_bytes = c.free_bytes;
        disk.volumes = vec![c, recovery];
        Inventory {
            disks: vec![disk, Disk::new(DiskOrdinal(1))],
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_render_json_structure() {
        let json = render_json(&sample(), fixed_time()).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(v["generated_at"], "2024-05-01T12:00:00Z");
        let disks = v["disks"].as_array().unwrap();
        assert_eq!(disks.len(), 2);

        let d0 = &disks[0];
        assert_eq!(d0["name"], "PhysicalDrive0");
        assert_eq!(d0["vendor"], "Samsung");
        assert_eq!(d0["protocol"], "NVME");
        assert_eq!(d0["size_gb"], 931.51);
        assert_eq!(d0["free_bytes"], 107_374_182_400u64);
        assert_eq!(d0["free_gb"], 100.0);
        // The recovery partition reports no capacity.
        assert_eq!(d0["volumes_size_bytes"], 536_870_912_000u64);
        assert_eq!(d0["volumes_size_gb"], 500.0);

        let vols = d0["volumes"].as_array().unwrap();
        assert_eq!(vols.len(), 2);
        assert_eq!(vols[0]["letter"], "C:/");
        assert_eq!(vols[0]["label"], "Windows");
        assert_eq!(vols[0]["filesystem"], "NTFS");
        assert_eq!(vols[0]["type"], "Logical Volume");
        assert_eq!(vols[0]["size_gb"], 500.0);
        assert_eq!(vols[0]["offset"], 290_455_552u64);
        assert_eq!(vols[1]["type"], "Partition");
        assert_eq!(vols[1]["letter"], "");
    }

    #[test]
    fn test_render_json_keeps_every_key_for_empty_fields() {
        let json = render_json(&sample(), fixed_time()).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        let d1 = &v["disks"][1];
        for key in ["name", "vendor", "model", "serial", "protocol", "size_gb", "free_gb"] {
            assert!(d1.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(d1["vendor"], "");
        assert_eq!(d1["size_gb"], 0.0);
        assert_eq!(d1["protocol"], "Unknown");
        assert_eq!(d1["volumes"].as_array().unwrap().len(), 0);

        let recovery = &v["disks"][0]["volumes"][1];
        for key in ["letter", "label", "filesystem", "size_gb", "free_gb", "offset"] {
            assert!(recovery.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(recovery["free_gb"], 0.0);
    }

    /// Accepts `limit` bytes, then fails like a full disk.
    struct FullDisk {
        limit: usize,
    }

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.limit == 0 {
                return Err(io::Error::other("no space left on device"));
            }
            let n = buf.len().min(self.limit);
            self.limit -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_failure_is_io_error_on_path() {
        let inv = sample();
        let doc = InventoryDocument::new(&inv, fixed_time());
        let path = Path::new("output/disk_info.json");

        let err = write_document(&doc, FullDisk { limit: 16 }, path).unwrap_err();
        match err {
            ExportError::Io { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.to_string(), "no space left on device");
            }
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_render_json_is_stable_for_same_input() {
        let inv = sample();
        assert_eq!(
            render_json(&inv, fixed_time()).unwrap(),
            render_json(&inv, fixed_time()).unwrap()
        );
    }
}
