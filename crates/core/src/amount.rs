//! Monetary amounts.

/// Unsigned amount in the smallest unit of the settlement medium.
///
/// 128 bits so that 18-decimal token units (e.g. `100 * 10^18`) fit.
pub type Amount = u128;

/// Floor-divide `total` into `parts` equal shares.
///
/// Returns `(share, remainder)`, or `None` when `parts == 0`.
pub fn split_evenly(total: Amount, parts: usize) -> Option<(Amount, Amount)> {
    let parts = Amount::try_from(parts).ok().filter(|p| *p > 0)?;
    Some((total / parts, total % parts))
}
