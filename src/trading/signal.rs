//! SMA crossover signal evaluation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::indicators::sma;

use super::error::{TradeCalcError, TradeCalcResult};

/// Trading signal produced by an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

/// Detects a fast/slow SMA crossover between the two most recent closes.
///
/// Stateless: every call recomputes both averages over the supplied window,
/// so the caller provides a fresh window each poll.
#[derive(Debug, Clone, Copy)]
pub struct SmaCrossover {
    fast: usize,
    slow: usize,
}

impl SmaCrossover {
    /// Create an evaluator with the given periods; the fast period must be
    /// strictly shorter than the slow one.
    pub fn new(fast: usize, slow: usize) -> TradeCalcResult<Self> {
        if fast == 0 || slow == 0 {
            return Err(TradeCalcError::InvalidInput(
                "moving-average periods must be positive".to_string(),
            ));
        }
        if fast >= slow {
            return Err(TradeCalcError::InvalidInput(format!(
                "fast period {} must be shorter than slow period {}",
                fast, slow
            )));
        }
        Ok(Self { fast, slow })
    }

    pub fn fast_period(&self) -> usize {
        self.fast
    }

    pub fn slow_period(&self) -> usize {
        self.slow
    }

    /// Minimum number of closes `evaluate` accepts.
    pub fn min_closes(&self) -> usize {
        self.slow + 1
    }

    /// Bars the polling loop should request per cycle.
    pub fn preferred_window(&self) -> usize {
        self.slow + 2
    }

    /// Evaluate the crossover on a time-ascending close series.
    ///
    /// BUY when the fast average moves from at-or-below the slow average to
    /// above it between the previous and current index; SELL on the mirror
    /// move; HOLD otherwise.
    pub fn evaluate(&self, closes: &[Decimal]) -> TradeCalcResult<Signal> {
        let required = self.min_closes();
        if closes.len() < required {
            return Err(TradeCalcError::InsufficientData {
                required,
                actual: closes.len(),
            });
        }

        let insufficient = || TradeCalcError::InsufficientData {
            required,
            actual: closes.len(),
        };

        let previous = &closes[..closes.len() - 1];
        let prev_fast = sma(previous, self.fast).ok_or_else(insufficient)?;
        let prev_slow = sma(previous, self.slow).ok_or_else(insufficient)?;
        let curr_fast = sma(closes, self.fast).ok_or_else(insufficient)?;
        let curr_slow = sma(closes, self.slow).ok_or_else(insufficient)?;

        if prev_fast <= prev_slow && curr_fast > curr_slow {
            Ok(Signal::Buy)
        } else if prev_fast >= prev_slow && curr_fast < curr_slow {
            Ok(Signal::Sell)
        } else {
            Ok(Signal::Hold)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn closes(values: &[f64]) -> Vec<Decimal> {
        values
            .iter()
            .map(|v| Decimal::try_from(*v).unwrap())
            .collect()
    }

    #[test]
    fn test_upward_cross_is_buy() {
        // Declining series, then a jump: fast crosses above slow at the end.
        let series = closes(&[1.13, 1.12, 1.11, 1.10, 1.09, 1.20]);
        let evaluator = SmaCrossover::new(2, 4).unwrap();
        assert_eq!(evaluator.evaluate(&series).unwrap(), Signal::Buy);
    }

    #[test]
    fn test_downward_cross_is_sell() {
        let series = closes(&[1.09, 1.10, 1.11, 1.12, 1.13, 1.02]);
        let evaluator = SmaCrossover::new(2, 4).unwrap();
        assert_eq!(evaluator.evaluate(&series).unwrap(), Signal::Sell);
    }

    #[test]
    fn test_steady_trend_is_hold() {
        // Monotonic rise: the fast average is above the slow one at both
        // indices, so nothing crosses.
        let series = closes(&[1.10, 1.11, 1.12, 1.13, 1.20, 1.25]);
        let evaluator = SmaCrossover::new(2, 4).unwrap();
        assert_eq!(evaluator.evaluate(&series).unwrap(), Signal::Hold);
    }

    #[test]
    fn test_flat_series_is_hold() {
        let series = vec![dec!(1.10); 10];
        let evaluator = SmaCrossover::new(2, 4).unwrap();
        assert_eq!(evaluator.evaluate(&series).unwrap(), Signal::Hold);
    }

    #[test]
    fn test_short_window_is_insufficient_data() {
        let evaluator = SmaCrossover::new(2, 4).unwrap();
        let err = evaluator
            .evaluate(&closes(&[1.10, 1.11, 1.12, 1.13]))
            .unwrap_err();
        assert_eq!(
            err,
            TradeCalcError::InsufficientData {
                required: 5,
                actual: 4
            }
        );
    }

    #[test]
    fn test_exactly_minimum_window_evaluates() {
        let evaluator = SmaCrossover::new(2, 4).unwrap();
        let series = closes(&[1.13, 1.12, 1.11, 1.10, 1.20]);
        assert!(evaluator.evaluate(&series).is_ok());
    }

    #[test]
    fn test_invalid_periods_rejected() {
        assert!(matches!(
            SmaCrossover::new(0, 4),
            Err(TradeCalcError::InvalidInput(_))
        ));
        assert!(matches!(
            SmaCrossover::new(4, 4),
            Err(TradeCalcError::InvalidInput(_))
        ));
        assert!(matches!(
            SmaCrossover::new(5, 4),
            Err(TradeCalcError::InvalidInput(_))
        ));
    }
}
