//! Formatting utilities

use humansize::{DECIMAL, format_size};

/// Format a byte count in human-readable form
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Format an offset the way hex dumps show it
pub fn format_offset(offset: usize) -> String {
    format!("0x{offset:08X}")
}

/// Format `part` as a percentage of `whole`
pub fn format_coverage(part: usize, whole: usize) -> String {
    if whole == 0 {
        "N/A".to_string()
    } else {
        format!("{:.1}%", part as f64 / whole as f64 * 100.0)
    }
}
