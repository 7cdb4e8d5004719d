//! Simple moving average.

use rust_decimal::Decimal;

/// Mean of the trailing `period` values.
///
/// Returns `None` when `period` is zero or the series is shorter than
/// `period`.
pub fn sma(values: &[Decimal], period: usize) -> Option<Decimal> {
    if period == 0 || values.len() < period {
        return None;
    }

    let window = &values[values.len() - period..];
    let sum: Decimal = window.iter().copied().sum();
    Some(sum / Decimal::from(period as u64))
}
