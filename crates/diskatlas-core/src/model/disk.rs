/// Physical disk records and the inventory tree they form.
use super::volume::Volume;
use std::fmt;

/// Ordinal of a physical disk as enumerated by the OS (`PhysicalDrive<N>`).
///
/// Only stable within one run; the OS may renumber disks across reboots
/// or hot-plug events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiskOrdinal(pub u32);

impl DiskOrdinal {
    /// Device name used to open the disk, e.g. `PhysicalDrive0`.
    pub fn physical_name(self) -> String {
        format!("PhysicalDrive{}", self.0)
    }
}

impl fmt::Display for DiskOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bus the disk is attached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusProtocol {
    Nvme,
    Usb,
    Sata,
    Scsi,
    Ata,
    #[default]
    Unknown,
}

// STORAGE_BUS_TYPE values from the Windows DDK.
const BUS_TYPE_SCSI: u32 = 0x01;
const BUS_TYPE_ATA: u32 = 0x03;
const BUS_TYPE_USB: u32 = 0x07;
const BUS_TYPE_SATA: u32 = 0x0B;
const BUS_TYPE_NVME: u32 = 0x11;

impl BusProtocol {
    /// Map a raw `STORAGE_BUS_TYPE` value. Anything outside the tracked
    /// buses (SAS, iSCSI, SD, virtual, ...) is `Unknown`.
    pub fn from_bus_type(raw: u32) -> Self {
        match raw {
            BUS_TYPE_NVME => Self::Nvme,
            BUS_TYPE_USB => Self::Usb,
            BUS_TYPE_SATA => Self::Sata,
            BUS_TYPE_SCSI => Self::Scsi,
            BUS_TYPE_ATA => Self::Ata,
            _ => Self::Unknown,
        }
    }

    /// Label used in exports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Nvme => "NVME",
            Self::Usb => "USB",
            Self::Sata => "SATA",
            Self::Scsi => "SCSI",
            Self::Ata => "ATA",
            Self::Unknown => "Unknown",
        }
    }
}

/// A physical disk that was opened successfully during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disk {
    pub ordinal_index: DiskOrdinal,
    /// `PhysicalDrive<N>`.
    pub physical_name: String,
    pub vendor: String,
    pub model: String,
    pub serial_number: String,
    pub protocol: BusProtocol,
    /// Raw device capacity from the drive geometry query.
    pub total_bytes: u64,
    /// Sum of the free space of the volumes attached to this disk.
    /// Unpartitioned space is deliberately not counted.
    pub free_bytes: u64,
    /// Volumes backed by this disk, in discovery order.
    pub volumes: Vec<Volume>,
}

impl Disk {
    /// Create a disk with no identity strings, no capacity, and no volumes.
    pub fn new(ordinal_index: DiskOrdinal) -> Self {
        Self {
            ordinal_index,
            physical_name: ordinal_index.physical_name(),
            vendor: String::new(),
            model: String::new(),
            serial_number: String::new(),
            protocol: BusProtocol::Unknown,
            total_bytes: 0,
            free_bytes: 0,
            volumes: Vec::new(),
        }
    }

    /// Total capacity of the attached volumes.
    pub fn volume_total_bytes(&self) -> u64 {
        self.volumes
            .iter()
            .fold(0u64, |acc, v| acc.saturating_add(v.total_bytes))
    }
}

/// The correlated disk-owns-volumes tree, in disk enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub disks: Vec<Disk>,
}

impl Inventory {
    /// Number of disks.
    pub fn len(&self) -> usize {
        self.disks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    /// Number of volumes attached across all disks.
    pub fn volume_count(&self) -> usize {
        self.disks.iter().map(|d| d.volumes.len()).sum()
    }

    /// Look up a disk by ordinal.
    pub fn disk(&self, ordinal: DiskOrdinal) -> Option<&Disk> {
        self.disks.iter().find(|d| d.ordinal_index == ordinal)
    }
}
