/// Size conversion and formatting: byte counts for exports and the console.
///
/// All internal sizes are `u64` bytes. Floating point is only used
/// at the export/display boundary.

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Convert a byte count to gigabytes (bytes / 2^30), rounded to two decimals.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    (bytes as f64 / GIB * 100.0).round() / 100.0
}

/// Format a byte count into a human-readable string with appropriate unit.
///
/// Binary units (1 KB = 1024 B), labelled with the short forms users
/// expect from disk tools.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const TB: f64 = GIB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else if b < GIB {
        format!("{:.1} MB", b / MB)
    } else if b < TB {
        format!("{:.2} GB", b / GIB)
    } else {
        format!("{:.2} TB", b / TB)
    }
}
