//! Formatted output helpers for CLI commands.

/// Renders a byte count with the largest binary unit that keeps it at or above one.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [(&str, u64); 3] = [("GiB", 1 << 30), ("MiB", 1 << 20), ("KiB", 1 << 10)];

    UNITS
        .iter()
        .find(|&&(_, size)| bytes >= size)
        .map_or_else(
            || format!("{bytes} B"),
            |&(unit, size)| format!("{:.1} {unit}", bytes as f64 / size as f64),
        )
}

/// Formats a counter that may be missing because its controller is unavailable.
#[must_use]
pub fn format_optional(value: Option<u64>, format: impl Fn(u64) -> String) -> String {
    value.map_or_else(|| "-".to_owned(), format)
}
