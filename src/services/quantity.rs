//! Quantity clipping

use crate::types::Quantity;

/// Coerce a raw quantity field into a bounded non-negative count.
///
/// Absent, non-numeric, and negative values all clip to 0; values above
/// `max` clamp to `max`. Float values truncate toward zero. Total function,
/// never fails.
pub fn clip_quantity(value: Option<&Quantity>, max: u32) -> u32 {
    let n: i64 = match value {
        Some(Quantity::Int(n)) => *n,
        Some(Quantity::Float(f)) => *f as i64,
        Some(Quantity::Text(s)) => s.trim().parse().unwrap_or(0),
        Some(Quantity::Other(_)) | None => 0,
    };
    if n < 0 {
        0
    } else if n > i64::from(max) {
        max
    } else {
        n as u32
    }
}
