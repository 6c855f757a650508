/// Data model for the storage inventory.
///
/// Volumes and disks are produced by discovery with no links between
/// them; the correlation pass moves each volume under the disk that
/// backs it and the result is an [`Inventory`].
pub mod disk;
pub mod size;
pub mod volume;

pub use disk::{BusProtocol, Disk, DiskOrdinal, Inventory};
pub use volume::{Volume, VolumeKind};
