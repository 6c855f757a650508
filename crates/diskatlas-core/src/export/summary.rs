/// Plain-text inventory report for the console.
use crate::model::size::format_size;
use crate::model::{Disk, Inventory, Volume};

const RULE: &str = "=================================================================";

fn or_na(s: &str) -> &str {
    if s.is_empty() {
        "N/A"
    } else {
        s
    }
}

/// Render one block per disk with its volumes listed underneath.
pub fn render_summary(inventory: &Inventory) -> String {
    if inventory.is_empty() {
        return "No physical disks found.\n".to_string();
    }

    let mut out = String::new();
    for d in &inventory.disks {
        out.push_str(&disk_block(d));
        for v in &d.volumes {
            out.push_str(&volume_line(v));
        }
    }
    out.push_str(RULE);
    out.push('\n');
    out
}

fn disk_block(d: &Disk) -> String {
    format!(
        "{RULE}\n\
         DISK: {}\n\
         \x20 Vendor   : {}\n\
         \x20 Model    : {}\n\
         \x20 Serial   : {}\n\
         \x20 Protocol : {}\n\
         \x20 Capacity : {}\n\
         \x20 Free     : {}\n\
         \x20 Volumes ({}, {} total):\n",
        d.physical_name,
        or_na(&d.vendor),
        or_na(&d.model),
        or_na(&d.serial_number),
        d.protocol.label(),
        format_size(d.total_bytes),
        format_size(d.free_bytes),
        d.volumes.len(),
        format_size(d.volume_total_bytes()),
    )
}

fn volume_line(v: &Volume) -> String {
    let mount = if v.mount_point.is_empty() { "[-]" } else { v.mount_point.as_str() };
    format!(
        "    -> {:<5} | {:<12} | FS: {:<8} | Size: {:>10} | Free: {:>10} | Offset: {}\n",
        mount,
        v.label,
        v.filesystem_name,
        format_size(v.total_bytes),
        format_size(v.free_bytes),
        v.offset_bytes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DiskOrdinal;

    #[test]
    fn test_summary_empty_inventory() {
        assert_eq!(render_summary(&Inventory::default()), "No physical disks found.\n");
    }

    #[test]
    fn test_summary_lists_disks_and_volumes() {
        let mut d = Disk::new(DiskOrdinal(0));
        d.total_bytes = 1_099_511_627_776;
        d.volumes = vec![
            Volume::new("V1", "C:/").with_capacity(1_073_741_824, 0),
            Volume::new("V2", ""),
        ];
        let text = render_summary(&Inventory { disks: vec![d] });

        assert!(text.contains("DISK: PhysicalDrive0"));
        assert!(text.contains("Vendor   : N/A"));
        assert!(text.contains("Capacity : 1.00 TB"));
        assert!(text.contains("  Volumes (2, 1.00 GB total):"));
        assert!(text.contains("-> C:/"));
        assert!(text.contains("-> [-]"));
    }

    #[test]
    fn test_summary_line_layout() {
        let mut d = Disk::new(DiskOrdinal(1));
        d.vendor = "Samsung".into();
        d.volumes = vec![Volume::new("V1", "D:/"), Volume::new("V2", "E:/")];
        let text = render_summary(&Inventory {
            disks: vec![d, Disk::new(DiskOrdinal(2))],
        });
        let lines: Vec<&str> = text.lines().collect();

        // Two 9-line disk blocks, two volume lines, closing rule.
        assert_eq!(lines.len(), 9 + 2 + 9 + 1);
        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1], "DISK: PhysicalDrive1");
        assert_eq!(lines[2], "  Vendor   : Samsung");
        assert!(lines[9].starts_with("    -> D:/"));
        assert!(lines[10].starts_with("    -> E:/"));
        assert_eq!(lines[11], RULE);
        assert_eq!(lines[12], "DISK: PhysicalDrive2");
        assert_eq!(lines[19], "  Volumes (0, 0 B total):");
        assert_eq!(*lines.last().unwrap(), RULE);
    }
}
