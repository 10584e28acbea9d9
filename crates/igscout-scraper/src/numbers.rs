//! Expansion of abbreviated profile counts (`"12.5k"`, `"1.5m"`).

/// Normalize a count token from a profile summary to a float.
///
/// A token containing `k` is multiplied by 1,000 and one containing `m` by
/// 1,000,000 (`k` wins when both appear). Every character other than digits
/// and `.` is stripped before parsing, so `"1,234"` reads as `1234`.
///
/// Returns `None` when nothing parseable remains.
#[must_use]
pub fn normalize_count(token: &str) -> Option<f64> {
    let multiplier = if token.contains('k') {
        1_000.0
    } else if token.contains('m') {
        1_000_000.0
    } else {
        1.0
    };

    let digits: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    digits.parse::<f64>().ok().map(|n| n * multiplier)
}
