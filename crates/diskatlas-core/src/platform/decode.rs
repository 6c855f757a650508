/// Decoders for raw IOCTL output buffers.
///
/// `DeviceIoControl` fills a caller-supplied byte buffer whose layout is
/// defined by the DDK structures. Instead of casting the buffer to those
/// structures, each decoder here checks the returned length and every
/// embedded offset before reading, and fails the single query on a short
/// or inconsistent buffer.
///
/// These functions are platform-neutral so they can be tested anywhere.
use crate::model::{BusProtocol, DiskOrdinal};
use thiserror::Error;

/// A returned buffer did not match the structure it should contain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{structure}: buffer holds {actual} bytes, need at least {needed}")]
    Truncated {
        structure: &'static str,
        needed: usize,
        actual: usize,
    },
}

/// First extent of a volume, from `VOLUME_DISK_EXTENTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstExtent {
    pub disk: DiskOrdinal,
    pub offset_bytes: u64,
    pub length_bytes: u64,
    /// Total number of extents the volume reported.
    pub extent_count: u32,
}

/// Identity strings and bus from `STORAGE_DEVICE_DESCRIPTOR`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub vendor: String,
    pub model: String,
    pub serial_number: String,
    pub protocol: BusProtocol,
}

// VOLUME_DISK_EXTENTS:
//   0: NumberOfDiskExtents (u32), 4 bytes padding
//   8: DISK_EXTENT[]: DiskNumber (u32) + 4 padding, StartingOffset (i64), ExtentLength (i64)
const EXTENTS_HEADER_LEN: usize = 8;
const DISK_EXTENT_LEN: usize = 24;

// STORAGE_DEVICE_DESCRIPTOR:
//  12: VendorIdOffset, 16: ProductIdOffset, 20: ProductRevisionOffset,
//  24: SerialNumberOffset, 28: BusType, all u32.
const DESCRIPTOR_VENDOR_OFFSET: usize = 12;
const DESCRIPTOR_PRODUCT_OFFSET: usize = 16;
const DESCRIPTOR_SERIAL_OFFSET: usize = 24;
const DESCRIPTOR_BUS_TYPE: usize = 28;
const DESCRIPTOR_MIN_LEN: usize = DESCRIPTOR_BUS_TYPE + 4;

// DISK_GEOMETRY_EX: DISK_GEOMETRY (24 bytes) then DiskSize (i64).
const GEOMETRY_DISK_SIZE: usize = 24;
const GEOMETRY_MIN_LEN: usize = GEOMETRY_DISK_SIZE + 8;

fn require(structure: &'static str, buf: &[u8], needed: usize) -> Result<(), DecodeError> {
    if buf.len() < needed {
        return Err(DecodeError::Truncated {
            structure,
            needed,
            actual: buf.len(),
        });
    }
    Ok(())
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(raw)
}

fn read_i64(buf: &[u8], at: usize) -> i64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&buf[at..at + 8]);
    i64::from_le_bytes(raw)
}

/// Decode the first extent of a `VOLUME_DISK_EXTENTS` buffer.
///
/// `buf` must be exactly the bytes the IOCTL reported as returned.
/// Returns `Ok(None)` when the volume reports zero extents.
pub fn first_extent(buf: &[u8]) -> Result<Option<FirstExtent>, DecodeError> {
    const NAME: &str = "VOLUME_DISK_EXTENTS";
    require(NAME, buf, 4)?;
    let extent_count = read_u32(buf, 0);
    if extent_count == 0 {
        return Ok(None);
    }
    require(NAME, buf, EXTENTS_HEADER_LEN + DISK_EXTENT_LEN)?;

    let base = EXTENTS_HEADER_LEN;
    Ok(Some(FirstExtent {
        disk: DiskOrdinal(read_u32(buf, base)),
        offset_bytes: read_i64(buf, base + 8).max(0) as u64,
        length_bytes: read_i64(buf, base + 16).max(0) as u64,
        extent_count,
    }))
}

/// Read the NUL-terminated ASCII string that `offset` points to.
///
/// A zero offset means the field is absent; an offset at or past the end
/// of the buffer is treated the same way. An unterminated string ends at
/// the end of the buffer.
fn descriptor_string(buf: &[u8], offset: u32) -> String {
    let start = offset as usize;
    if start == 0 || start >= buf.len() {
        return String::new();
    }
    let tail = &buf[start..];
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    String::from_utf8_lossy(&tail[..end]).trim().to_string()
}

/// Decode a `STORAGE_DEVICE_DESCRIPTOR` buffer.
///
/// When the vendor string is empty the first word of the model is used
/// instead; many NVMe and USB bridges only report a combined product id.
pub fn device_identity(buf: &[u8]) -> Result<DeviceIdentity, DecodeError> {
    require("STORAGE_DEVICE_DESCRIPTOR", buf, DESCRIPTOR_MIN_LEN)?;

    let mut vendor = descriptor_string(buf, read_u32(buf, DESCRIPTOR_VENDOR_OFFSET));
    let model = descriptor_string(buf, read_u32(buf, DESCRIPTOR_PRODUCT_OFFSET));
    let serial_number = descriptor_string(buf, read_u32(buf, DESCRIPTOR_SERIAL_OFFSET));
    if vendor.is_empty() {
        vendor = vendor_from_model(&model);
    }

    Ok(DeviceIdentity {
        vendor,
        model,
        serial_number,
        protocol: BusProtocol::from_bus_type(read_u32(buf, DESCRIPTOR_BUS_TYPE)),
    })
}

/// First whitespace-separated token of a model string, or empty.
pub fn vendor_from_model(model: &str) -> String {
    model.split_whitespace().next().unwrap_or_default().to_string()
}

/// Decode the disk size from a `DISK_GEOMETRY_EX` buffer.
pub fn disk_size(buf: &[u8]) -> Result<u64, DecodeError> {
    require("DISK_GEOMETRY_EX", buf, GEOMETRY_MIN_LEN)?;
    Ok(read_i64(buf, GEOMETRY_DISK_SIZE).max(0) as u64)
}

/// Outcome of one call to a Win32 function that fills a caller-sized
/// UTF-16 buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Done,
    /// `ERROR_MORE_DATA`, with the length the call asked for.
    TooSmall(usize),
    Failed,
}

/// Run `query` with an `initial`-element buffer. If it reports the
/// buffer too small, retry once with the length it asked for.
pub fn fill_growing<F>(initial: usize, mut query: F) -> Option<Vec<u16>>
where
    F: FnMut(&mut [u16]) -> Fill,
{
    let mut buf = vec![0u16; initial];
    match query(&mut buf) {
        Fill::Done => Some(buf),
        Fill::TooSmall(needed) if needed > buf.len() => {
            buf = vec![0u16; needed];
            (query(&mut buf) == Fill::Done).then_some(buf)
        }
        Fill::TooSmall(_) | Fill::Failed => None,
    }
}

/// First entry of a NUL-separated multi-string as a mount point with `/`
/// separators, or `None` if the list is empty.
pub fn first_mount_point(multi_sz: &[u16]) -> Option<String> {
    let end = multi_sz.iter().position(|&c| c == 0).unwrap_or(multi_sz.len());
    if end == 0 {
        return None;
    }
    Some(String::from_utf16_lossy(&multi_sz[..end]).replace('\\', "/"))
}
