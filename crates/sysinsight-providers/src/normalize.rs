//! Conversions applied between raw OS readings and the wire structs.
//!
//! Every optional number coming out of a [`crate::HostProbe`] goes through
//! one of these, so the JSON never carries `null` where a number is expected.

pub const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Absent values become the type's zero.
pub fn or_zero<T: Default>(value: Option<T>) -> T {
    value.unwrap_or_default()
}

/// Absent or non-finite floats become `0.0`. serde_json writes NaN as `null`.
pub fn number<T: Into<f64>>(value: Option<T>) -> f64 {
    finite(value.map(Into::into).unwrap_or(0.0))
}

pub fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    finite((value * factor).round() / factor)
}

pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Bytes to GiB, two decimals.
pub fn gib(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_GIB)
}

/// `part / whole` as a percentage with one decimal; 0 when `whole` is 0.
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 / whole as f64 * 100.0)
}
