//! Human-readable file sizes.

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Format a byte count in the largest binary unit where it is at least 1.
///
/// Bytes are shown as an integer, larger units with two decimals.
pub fn format_size(size_bytes: u64) -> String {
    if size_bytes < KIB {
        format!("{size_bytes} octets")
    } else if size_bytes < MIB {
        format!("{:.2} Ko", size_bytes as f64 / KIB as f64)
    } else if size_bytes < GIB {
        format!("{:.2} Mo", size_bytes as f64 / MIB as f64)
    } else {
        format!("{:.2} Go", size_bytes as f64 / GIB as f64)
    }
}
