//! Relative Strength Index with Wilder's smoothing.
//!
//! The first average gain/loss is a simple mean over the first `period`
//! price changes; every later average is
//! `(prev_avg * (period - 1) + current) / period`.
//! `RSI = 100 - 100 / (1 + avg_gain / avg_loss)`, and a window with no
//! losses (including a flat one) evaluates to 100.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::trading::{TradeCalcError, TradeCalcResult};

/// Compute the RSI series for a time-ascending close series.
///
/// One entry per input close; warmup entries (fewer than `period` price
/// changes available) are `None`.
pub fn rsi(closes: &[Decimal], period: usize) -> TradeCalcResult<Vec<Option<Decimal>>> {
    if period == 0 {
        return Err(TradeCalcError::InvalidInput(
            "RSI period must be positive".to_string(),
        ));
    }
    let required = period + 1;
    if closes.len() < required {
        return Err(TradeCalcError::InsufficientData {
            required,
            actual: closes.len(),
        });
    }

    let n = Decimal::from(period as u64);
    let mut values: Vec<Option<Decimal>> = vec![None; period];
    let mut avg_gain = Decimal::ZERO;
    let mut avg_loss = Decimal::ZERO;

    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        let gain = change.max(Decimal::ZERO);
        let loss = (-change).max(Decimal::ZERO);

        if i < period {
            // Warmup: accumulate for the initial simple mean.
            avg_gain += gain;
            avg_loss += loss;
            continue;
        }

        if i == period {
            avg_gain = (avg_gain + gain) / n;
            avg_loss = (avg_loss + loss) / n;
        } else {
            avg_gain = (avg_gain * (n - Decimal::ONE) + gain) / n;
            avg_loss = (avg_loss * (n - Decimal::ONE) + loss) / n;
        }

        let value = if avg_loss.is_zero() {
            dec!(100)
        } else {
            dec!(100) - dec!(100) / (Decimal::ONE + avg_gain / avg_loss)
        };
        values.push(Some(value));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closes(values: &[f64]) -> Vec<Decimal> {
        values
            .iter()
            .map(|v| Decimal::try_from(*v).unwrap())
            .collect()
    }

    #[test]
    fn test_output_aligns_with_input() {
        let series = closes(&[
            44.0, 44.25, 44.5, 43.75, 44.5, 44.25, 44.75, 45.25, 45.5, 45.25, 45.5, 46.0, 46.25,
            46.0, 46.5,
        ]);
        let values = rsi(&series, 14).unwrap();

        assert_eq!(values.len(), series.len());
        for v in &values[..14] {
            assert!(v.is_none());
        }
        assert!(values[14].is_some());
    }

    #[test]
    fn test_all_gains_is_100() {
        let series: Vec<Decimal> = (0..15).map(|i| Decimal::from(100 + i)).collect();
        let values = rsi(&series, 14).unwrap();
        assert_eq!(values[14], Some(dec!(100)));
    }

    #[test]
    fn test_all_losses_is_0() {
        let series: Vec<Decimal> = (0..15).map(|i| Decimal::from(100 - i)).collect();
        let values = rsi(&series, 14).unwrap();
        assert_eq!(values[14], Some(dec!(0)));
    }

    #[test]
    fn test_flat_series_is_100() {
        let series = vec![dec!(1.10); 15];
        let values = rsi(&series, 14).unwrap();
        assert_eq!(values[14], Some(dec!(100)));
    }

    #[test]
    fn test_stays_in_range() {
        let series: Vec<Decimal> = (0..40)
            .map(|i| Decimal::from(100) + Decimal::from((i * 7) % 11) - Decimal::from(5))
            .collect();

        for value in rsi(&series, 14).unwrap().into_iter().flatten() {
            assert!(value >= Decimal::ZERO && value <= dec!(100));
        }
    }

    #[test]
    fn test_bullish_sample_is_above_50() {
        let series = closes(&[
            44.0, 44.25, 44.5, 43.75, 44.5, 44.25, 44.75, 45.25, 45.5, 45.25, 45.5, 46.0, 46.25,
            46.0, 46.5,
        ]);
        let value = rsi(&series, 14).unwrap()[14].unwrap();
        assert!(value > dec!(50) && value < dec!(100));
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(matches!(
            rsi(&[dec!(1), dec!(2)], 0),
            Err(TradeCalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_short_series_rejected() {
        let err = rsi(&closes(&[44.0, 44.25]), 14).unwrap_err();
        assert_eq!(
            err,
            TradeCalcError::InsufficientData {
                required: 15,
                actual: 2
            }
        );
    }
}
