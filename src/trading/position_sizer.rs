//! Risk-based position sizing against broker lot constraints.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::models::SymbolSpec;

use super::error::{TradeCalcError, TradeCalcResult};

/// Converts an account risk budget into a broker-compliant lot size.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    risk_percent: Decimal,
}

impl PositionSizer {
    /// Create a sizer risking the given percentage of balance per trade.
    pub fn new(risk_percent: Decimal) -> Self {
        Self { risk_percent }
    }

    /// Calculate the lot size for a trade with the given stop distance.
    ///
    /// The raw size is `balance * risk% / (sl_pips * pip_value_per_lot)`,
    /// snapped to the nearest `lot_step` multiple and capped at `max_lot`.
    /// A snapped size below `min_lot` is a `ConstraintViolation` rather than
    /// a round-up: the broker minimum would risk more than the budget
    /// allows, and only the caller can decide to take that trade anyway.
    pub fn lot_size(
        &self,
        balance: Decimal,
        sl_pips: Decimal,
        symbol: &SymbolSpec,
    ) -> TradeCalcResult<Decimal> {
        if balance <= Decimal::ZERO {
            return Err(TradeCalcError::InvalidInput(format!(
                "balance must be positive, got {}",
                balance
            )));
        }
        if self.risk_percent <= Decimal::ZERO || self.risk_percent > dec!(100) {
            return Err(TradeCalcError::InvalidInput(format!(
                "risk percent must be in (0, 100], got {}",
                self.risk_percent
            )));
        }
        if sl_pips <= Decimal::ZERO {
            return Err(TradeCalcError::InvalidInput(format!(
                "stop-loss distance must be positive, got {} pips",
                sl_pips
            )));
        }
        if symbol.pip_value_per_lot <= Decimal::ZERO {
            return Err(TradeCalcError::InvalidInput(format!(
                "pip value per lot must be positive, got {}",
                symbol.pip_value_per_lot
            )));
        }
        if symbol.lot_step <= Decimal::ZERO {
            return Err(TradeCalcError::InvalidInput(format!(
                "lot step must be positive, got {}",
                symbol.lot_step
            )));
        }

        let risk_amount = balance * self.risk_percent / dec!(100);
        let raw_lots = risk_amount / (sl_pips * symbol.pip_value_per_lot);

        let snapped = (raw_lots / symbol.lot_step)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            * symbol.lot_step;

        if snapped < symbol.min_lot {
            return Err(TradeCalcError::ConstraintViolation(format!(
                "risk budget {} affords {} lots, below the {} minimum for {}",
                risk_amount, snapped, symbol.min_lot, symbol.name
            )));
        }

        Ok(snapped.min(symbol.max_lot).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eurusd() -> SymbolSpec {
        SymbolSpec {
            name: "EURUSD".to_string(),
            digits: 5,
            point: dec!(0.00001),
            min_lot: dec!(0.01),
            max_lot: dec!(100),
            lot_step: dec!(0.01),
            pip_value_per_lot: dec!(10),
        }
    }

    #[test]
    fn test_worked_example() {
        // risk = 100, raw = 100 / (30 * 10) = 0.333..., snapped to 0.33
        let sizer = PositionSizer::new(dec!(1.0));
        let lots = sizer.lot_size(dec!(10000), dec!(30), &eurusd()).unwrap();
        assert_eq!(lots, dec!(0.33));
    }

    #[test]
    fn test_snaps_to_nearest_step() {
        // raw = 200 / (30 * 10) = 0.666... -> 0.67
        let sizer = PositionSizer::new(dec!(2.0));
        let lots = sizer.lot_size(dec!(10000), dec!(30), &eurusd()).unwrap();
        assert_eq!(lots, dec!(0.67));
    }

    #[test]
    fn test_clamps_to_max_lot() {
        let sizer = PositionSizer::new(dec!(100));
        let lots = sizer
            .lot_size(dec!(100_000_000), dec!(1), &eurusd())
            .unwrap();
        assert_eq!(lots, dec!(100));
    }

    #[test]
    fn test_below_minimum_is_constraint_violation() {
        // risk = 1, raw = 1 / (30 * 10) = 0.0033 -> snaps to 0.00
        let sizer = PositionSizer::new(dec!(0.01));
        let err = sizer.lot_size(dec!(10000), dec!(30), &eurusd()).unwrap_err();
        assert!(matches!(err, TradeCalcError::ConstraintViolation(_)));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let sizer = PositionSizer::new(dec!(1.0));
        assert!(matches!(
            sizer.lot_size(dec!(0), dec!(30), &eurusd()),
            Err(TradeCalcError::InvalidInput(_))
        ));
        assert!(matches!(
            sizer.lot_size(dec!(10000), dec!(0), &eurusd()),
            Err(TradeCalcError::InvalidInput(_))
        ));
        assert!(matches!(
            PositionSizer::new(dec!(0)).lot_size(dec!(10000), dec!(30), &eurusd()),
            Err(TradeCalcError::InvalidInput(_))
        ));
        assert!(matches!(
            PositionSizer::new(dec!(101)).lot_size(dec!(10000), dec!(30), &eurusd()),
            Err(TradeCalcError::InvalidInput(_))
        ));

        let broken = SymbolSpec {
            pip_value_per_lot: dec!(0),
            ..eurusd()
        };
        assert!(matches!(
            sizer.lot_size(dec!(10000), dec!(30), &broken),
            Err(TradeCalcError::InvalidInput(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_result_within_bounds_and_on_step(
            balance in 100u32..1_000_000,
            risk_tenths in 1u32..1000,
            sl_pips in 1u32..500,
        ) {
            let symbol = eurusd();
            let sizer = PositionSizer::new(Decimal::from(risk_tenths) / dec!(10));

            if let Ok(lots) = sizer.lot_size(Decimal::from(balance), Decimal::from(sl_pips), &symbol) {
                prop_assert!(lots >= symbol.min_lot);
                prop_assert!(lots <= symbol.max_lot);
                prop_assert!((lots / symbol.lot_step).fract().is_zero());
            }
        }

        #[test]
        fn prop_non_increasing_in_stop_distance(
            balance in 1_000u32..1_000_000,
            sl_pips in 1u32..499,
        ) {
            let symbol = eurusd();
            let sizer = PositionSizer::new(dec!(1.0));

            let near = sizer.lot_size(Decimal::from(balance), Decimal::from(sl_pips), &symbol);
            let far = sizer.lot_size(Decimal::from(balance), Decimal::from(sl_pips + 1), &symbol);

            if let (Ok(near), Ok(far)) = (near, far) {
                prop_assert!(far <= near);
            }
        }
    }
}
