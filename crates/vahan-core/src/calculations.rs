//! Growth-rate arithmetic shared by the YoY and QoQ computations.

/// Fractional change from `previous` to `current`.
///
/// Returns `None` when `previous` is zero, so that "no base to compare
/// against" never masquerades as a 0 % change or an infinite one.
///
/// # Examples
///
/// ```
/// use vahan_core::calculations::pct_change;
///
/// assert_eq!(pct_change(150, 100), Some(0.5));
/// assert_eq!(pct_change(100, 100), Some(0.0));
/// assert_eq!(pct_change(10, 0), None);
/// ```
pub fn pct_change(current: u64, previous: u64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    let previous = previous as f64;
    Some((current as f64 - previous) / previous)
}

/// Change against an optional comparison value; a missing period yields
/// `None` just like a zero base.
pub fn pct_change_from(current: u64, previous: Option<u64>) -> Option<f64> {
    previous.and_then(|prev| pct_change(current, prev))
}
