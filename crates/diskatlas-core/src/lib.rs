/// DiskAtlas Core: discovery, correlation, and export.
///
/// This crate contains all inventory logic with no binary or UI concerns.
/// The correlation engine is pure and platform-neutral; only the
/// discovery probes touch the Windows storage stack.
///
/// # Modules
///
/// - [`model`]: Volume, disk, and inventory records plus size helpers.
/// - [`correlate`]: Attaches volumes to the disks that back them.
/// - [`platform`]: Volume and physical-disk discovery, IOCTL buffer decoding.
/// - [`export`]: JSON/CSV writers and the console summary.
/// - [`inventory`]: The discover → correlate pipeline.
pub mod correlate;
pub mod export;
pub mod inventory;
pub mod model;
pub mod platform;
