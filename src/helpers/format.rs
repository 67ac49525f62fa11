// Human-readable sizes and percentages for report cells

const KIB: f64 = 1024.0;
const UNITS: [(&str, f64); 4] = [
    ("T", KIB * KIB * KIB * KIB),
    ("G", KIB * KIB * KIB),
    ("M", KIB * KIB),
    ("K", KIB),
];

/// Format a byte count with a single-letter binary suffix and two decimals.
///
/// `0 -> "0.00b"`, `1024 -> "1.00K"`, `1536 -> "1.50K"`, `1048576 -> "1.00M"`.
pub fn format_bytes(value: u64) -> String {
    let size = value as f64;
    for (suffix, scale) in UNITS {
        if size >= scale {
            return format!("{:.2}{suffix}", size / scale);
        }
    }
    format!("{size:.2}b")
}

/// Like [`format_bytes`] but keeps the sign, for headroom values that can go negative.
pub fn format_signed_bytes(value: i64) -> String {
    if value < 0 {
        format!("-{}", format_bytes(value.unsigned_abs()))
    } else {
        format_bytes(value as u64)
    }
}

/// Percentage of `part` in `total` with one decimal, e.g. `"37.3%"`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// `part / total * 100`, or 0 when there is nothing to divide by.
pub fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 { 0.0 } else { part as f64 / total as f64 * 100.0 }
}
