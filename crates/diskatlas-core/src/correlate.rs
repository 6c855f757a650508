/// Correlation engine: attaches each volume to the physical disk that backs it.
///
/// Discovery produces two independent, unlinked collections. This pass
/// moves every volume whose first extent lives on a discovered disk into
/// that disk's volume list and derives the disk's free space from them.
///
/// # Rules
///
/// - Disk order is kept as given (enumeration order).
/// - Volume order within a disk is discovery order.
/// - A volume moves to at most one disk. If `disks` repeats an ordinal,
///   only the first disk with that ordinal receives volumes.
/// - Unmapped volumes, and volumes mapped to an ordinal that is not in
///   `disks`, are orphans: they never appear in the [`Inventory`].
/// - `free_bytes` of a disk is the sum of its volumes' free space, `0`
///   for a disk with no volumes.
///
/// The pass does no I/O and has no state, so equal inputs give equal output.
use crate::model::{Disk, DiskOrdinal, Inventory, Volume};
use std::collections::HashMap;

/// Result of a correlation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correlation {
    /// Disks with their attached volumes.
    pub inventory: Inventory,
    /// Volumes not backed by any disk in the inventory, in discovery order.
    pub orphans: Vec<Volume>,
}

/// Correlate volumes with disks and keep the orphans for diagnostics.
pub fn correlate_with_orphans(volumes: Vec<Volume>, mut disks: Vec<Disk>) -> Correlation {
    let mut slot_of: HashMap<DiskOrdinal, usize> = HashMap::with_capacity(disks.len());
    for (slot, disk) in disks.iter().enumerate() {
        slot_of.entry(disk.ordinal_index).or_insert(slot);
    }

    let mut orphans = Vec::new();
    for volume in volumes {
        match volume.backing_disk_index.and_then(|o| slot_of.get(&o)) {
            Some(&slot) => disks[slot].volumes.push(volume),
            None => orphans.push(volume),
        }
    }

    for disk in &mut disks {
        disk.free_bytes = disk
            .volumes
            .iter()
            .fold(0u64, |acc, v| acc.saturating_add(v.free_bytes));
    }

    Correlation {
        inventory: Inventory { disks },
        orphans,
    }
}

/// Correlate volumes with disks, dropping every volume that no disk claims.
pub fn correlate(volumes: Vec<Volume>, disks: Vec<Disk>) -> Inventory {
    let Correlation { inventory, orphans } = correlate_with_orphans(volumes, disks);
    if !orphans.is_empty() {
        tracing::debug!(
            "{} volume(s) not backed by an accessible disk were left out of the inventory",
            orphans.len()
        );
    }
    inventory
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn vol(path: &str, disk: Option<u32>, free: u64) -> Volume {
        let v = Volume::new(path, "").with_capacity(free * 2, free);
        match disk {
            Some(d) => v.with_extent(DiskOrdinal(d), 1_048_576, free * 2),
            None => v,
        }
    }

    fn disk(ordinal: u32) -> Disk {
        Disk::new(DiskOrdinal(ordinal))
    }

    fn paths(d: &Disk) -> Vec<&str> {
        d.volumes.iter().map(|v| v.device_path.as_str()).collect()
    }

    #[test]
    fn test_reference_scenario() {
        let disks = vec![disk(0), disk(1)];
        let volumes = vec![
            vol("V1", Some(0), 10),
            vol("V2", Some(0), 20),
            vol("V3", Some(5), 99),
        ];

        let inv = correlate(volumes, disks);

        assert_eq!(inv.len(), 2);
        assert_eq!(paths(&inv.disks[0]), vec!["V1", "V2"]);
        assert_eq!(inv.disks[0].free_bytes, 30);
        assert!(inv.disks[1].volumes.is_empty());
        assert_eq!(inv.disks[1].free_bytes, 0);
        assert_eq!(inv.volume_count(), 2);
    }

    #[test]
    fn test_orphans_are_reported_in_discovery_order() {
        let c = correlate_with_orphans(
            vec![
                vol("A", None, 1),
                vol("B", Some(3), 2),
                vol("C", Some(0), 3),
                vol("D", Some(7), 4),
            ],
            vec![disk(0)],
        );
        let orphan_paths: Vec<&str> = c.orphans.iter().map(|v| v.device_path.as_str()).collect();
        assert_eq!(orphan_paths, vec!["A", "B", "D"]);
        assert_eq!(paths(&c.inventory.disks[0]), vec!["C"]);
    }

    #[test]
    fn test_unmapped_volume_never_attaches_to_disk_zero() {
        let inv = correlate(vec![vol("unmapped", None, 50)], vec![disk(0)]);
        assert!(inv.disks[0].volumes.is_empty());
        assert_eq!(inv.disks[0].free_bytes, 0);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(correlate(Vec::new(), Vec::new()).is_empty());

        let inv = correlate(Vec::new(), vec![disk(0), disk(2)]);
        assert_eq!(inv.len(), 2);
        assert!(inv.disks.iter().all(|d| d.volumes.is_empty() && d.free_bytes == 0));

        let c = correlate_with_orphans(vec![vol("X", Some(0), 1)], Vec::new());
        assert!(c.inventory.is_empty());
        assert_eq!(c.orphans.len(), 1);
    }

    #[test]
    fn test_disk_order_is_preserved() {
        // Disks arrive out of ordinal order; output keeps the given order.
        let inv = correlate(
            vec![vol("on3", Some(3), 1), vol("on1", Some(1), 1)],
            vec![disk(3), disk(1), disk(2)],
        );
        let ordinals: Vec<u32> = inv.disks.iter().map(|d| d.ordinal_index.0).collect();
        assert_eq!(ordinals, vec![3, 1, 2]);
        assert_eq!(paths(&inv.disks[0]), vec!["on3"]);
        assert_eq!(paths(&inv.disks[1]), vec!["on1"]);
    }

    #[test]
    fn test_volume_order_follows_discovery_across_interleaving() {
        let inv = correlate(
            vec![
                vol("a0", Some(0), 1),
                vol("b1", Some(1), 1),
                vol("c0", Some(0), 1),
                vol("d1", Some(1), 1),
                vol("e0", Some(0), 1),
            ],
            vec![disk(0), disk(1)],
        );
        assert_eq!(paths(&inv.disks[0]), vec!["a0", "c0", "e0"]);
        assert_eq!(paths(&inv.disks[1]), vec!["b1", "d1"]);
    }

    #[test]
    fn test_volumes_are_disjoint_and_owned_by_matching_disk() {
        let volumes: Vec<Volume> = (0..20)
            .map(|i| vol(&format!("V{i}"), if i % 5 == 4 { None } else { Some(i % 4) }, i as u64))
            .collect();
        let inv = correlate(volumes, vec![disk(0), disk(1), disk(2)]);

        let mut seen = HashSet::new();
        for d in &inv.disks {
            for v in &d.volumes {
                assert!(seen.insert(v.device_path.clone()), "{} claimed twice", v.device_path);
                assert_eq!(v.backing_disk_index, Some(d.ordinal_index));
            }
        }
    }

    #[test]
    fn test_free_bytes_is_sum_of_volume_free_bytes() {
        let inv = correlate(
            vec![vol("a", Some(0), 100), vol("b", Some(0), 250), vol("c", Some(1), 7)],
            vec![disk(0), disk(1)],
        );
        for d in &inv.disks {
            let expected: u64 = d.volumes.iter().map(|v| v.free_bytes).sum();
            assert_eq!(d.free_bytes, expected);
        }
        assert_eq!(inv.disks[0].free_bytes, 350);
    }

    #[test]
    fn test_free_bytes_ignores_stale_value() {
        let mut stale = disk(0);
        stale.free_bytes = 12345;
        let inv = correlate(Vec::new(), vec![stale]);
        assert_eq!(inv.disks[0].free_bytes, 0);
    }

    #[test]
    fn test_free_bytes_saturates() {
        let inv = correlate(
            vec![vol("a", Some(0), 0), vol("b", Some(0), 0)]
                .into_iter()
                .map(|v| v.with_capacity(u64::MAX, u64::MAX))
                .collect(),
            vec![disk(0)],
        );
        assert_eq!(inv.disks[0].free_bytes, u64::MAX);
    }

    #[test]
    fn test_duplicate_ordinal_first_disk_wins() {
        let inv = correlate(vec![vol("a", Some(0), 5)], vec![disk(0), disk(0)]);
        assert_eq!(paths(&inv.disks[0]), vec!["a"]);
        assert!(inv.disks[1].volumes.is_empty());
    }

    #[test]
    fn test_correlation_is_deterministic() {
        let volumes = vec![vol("a", Some(1), 5), vol("b", None, 3), vol("c", Some(0), 9)];
        let disks = vec![disk(0), disk(1)];
        let first = correlate_with_orphans(volumes.clone(), disks.clone());
        let second = correlate_with_orphans(volumes, disks);
        assert_eq!(first, second);
    }
}
