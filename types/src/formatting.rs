//! Number and duration formatting shared by every snapshot consumer.

/// Format a damage number with K/M suffix for compact display.
///
/// - Values >= 1,000,000 are formatted as `X.XXM`
/// - Values >= 1,000 are formatted as `X.XXK`
/// - Values below 1,000 are formatted as-is
///
/// # Examples
/// ```
/// use relink_act_types::formatting::format_compact;
/// assert_eq!(format_compact(500), "500");
/// assert_eq!(format_compact(1_500), "1.50K");
/// assert_eq!(format_compact(1_500_000), "1.50M");
/// ```
pub fn format_compact(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}

/// Format a percentage with one decimal place.
///
/// # Examples
/// ```
/// use relink_act_types::formatting::format_pct;
/// assert_eq!(format_pct(42.7), "42.7%");
/// ```
pub fn format_pct(n: f64) -> String {
    format!("{:.1}%", n)
}

/// Format whole seconds as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours, so a 75 minute combat renders as `75:00`.
///
/// # Examples
/// ```
/// use relink_act_types::formatting::format_mmss;
/// assert_eq!(format_mmss(0), "00:00");
/// assert_eq!(format_mmss(125), "02:05");
/// ```
pub fn format_mmss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Render a 32-bit global id as lowercase hex, right-filled with `0` to 8 characters.
///
/// This is the display convention of the instrumentation source: the digits keep
/// their natural order and the fill goes on the right.
///
/// # Examples
/// ```
/// use relink_act_types::formatting::format_hex_id;
/// assert_eq!(format_hex_id(0x22a350f), "22a350f0");
/// assert_eq!(format_hex_id(0xdeadbeef), "deadbeef");
/// ```
pub fn format_hex_id(id: u32) -> String {
    format!("{:0<8}", format!("{:x}", id))
}
