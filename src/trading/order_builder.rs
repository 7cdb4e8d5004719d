//! Market-order construction from a live quote and pip distances.

use rust_decimal::Decimal;

use crate::models::{OrderRequest, OrderSide, SymbolSpec, Tick};

use super::error::{TradeCalcError, TradeCalcResult};

/// Builds an [`OrderRequest`] for a market order.
///
/// Entry always crosses the spread: ask for BUY, bid for SELL. Stop-loss and
/// take-profit distances are given in pips and converted to absolute prices
/// against the symbol's pip size; omitted distances leave the zero "unset"
/// sentinel in place.
#[derive(Debug, Clone)]
pub struct OrderBuilder<'a> {
    symbol: &'a SymbolSpec,
    side: OrderSide,
    tick: Tick,
    volume: Decimal,
    sl_pips: Option<Decimal>,
    tp_pips: Option<Decimal>,
    deviation: u32,
    magic: u64,
    comment: String,
}

impl<'a> OrderBuilder<'a> {
    pub fn new(symbol: &'a SymbolSpec, side: OrderSide, tick: Tick) -> Self {
        Self {
            symbol,
            side,
            tick,
            volume: Decimal::ZERO,
            sl_pips: None,
            tp_pips: None,
            deviation: 20,
            magic: 0,
            comment: String::new(),
        }
    }

    pub fn volume(mut self, lots: Decimal) -> Self {
        self.volume = lots;
        self
    }

    pub fn stop_loss_pips(mut self, pips: Option<Decimal>) -> Self {
        self.sl_pips = pips;
        self
    }

    pub fn take_profit_pips(mut self, pips: Option<Decimal>) -> Self {
        self.tp_pips = pips;
        self
    }

    pub fn deviation(mut self, points: u32) -> Self {
        self.deviation = points;
        self
    }

    pub fn magic(mut self, magic: u64) -> Self {
        self.magic = magic;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Assemble the request, validating volume and pip distances.
    pub fn build(self) -> TradeCalcResult<OrderRequest> {
        if self.volume <= Decimal::ZERO {
            return Err(TradeCalcError::InvalidInput(format!(
                "volume must be positive, got {}",
                self.volume
            )));
        }
        if self.volume < self.symbol.min_lot || self.volume > self.symbol.max_lot {
            return Err(TradeCalcError::ConstraintViolation(format!(
                "volume {} outside [{}, {}] for {}",
                self.volume, self.symbol.min_lot, self.symbol.max_lot, self.symbol.name
            )));
        }
        if self.symbol.lot_step > Decimal::ZERO
            && !(self.volume % self.symbol.lot_step).is_zero()
        {
            return Err(TradeCalcError::ConstraintViolation(format!(
                "volume {} is not a multiple of lot step {}",
                self.volume, self.symbol.lot_step
            )));
        }
        for (label, pips) in [("stop-loss", self.sl_pips), ("take-profit", self.tp_pips)] {
            if let Some(p) = pips {
                if p <= Decimal::ZERO {
                    return Err(TradeCalcError::InvalidInput(format!(
                        "{} distance must be positive, got {} pips",
                        label, p
                    )));
                }
            }
        }

        let entry = match self.side {
            OrderSide::Buy => self.tick.ask,
            OrderSide::Sell => self.tick.bid,
        };

        let pip = self.symbol.pip_size();
        let offset = |pips: Option<Decimal>, direction: Decimal| -> Decimal {
            match pips {
                Some(p) => self.symbol.quantize_price(entry + direction * p * pip),
                None => Decimal::ZERO,
            }
        };

        // Stop sits against the position, target with it.
        let (stop_loss, take_profit) = match self.side {
            OrderSide::Buy => (
                offset(self.sl_pips, Decimal::NEGATIVE_ONE),
                offset(self.tp_pips, Decimal::ONE),
            ),
            OrderSide::Sell => (
                offset(self.sl_pips, Decimal::ONE),
                offset(self.tp_pips, Decimal::NEGATIVE_ONE),
            ),
        };

        Ok(OrderRequest {
            symbol: self.symbol.name.clone(),
            side: self.side,
            volume: self.volume,
            price: entry,
            stop_loss,
            take_profit,
            deviation: self.deviation,
            magic: self.magic,
            comment: self.comment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

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

    fn tick() -> Tick {
        Tick {
            time: Utc::now(),
            bid: dec!(1.10000),
            ask: dec!(1.10012),
        }
    }

    #[test]
    fn test_buy_enters_at_ask_with_offsets() {
        let symbol = eurusd();
        let request = OrderBuilder::new(&symbol, OrderSide::Buy, tick())
            .volume(dec!(0.10))
            .stop_loss_pips(Some(dec!(50)))
            .take_profit_pips(Some(dec!(100)))
            .magic(77)
            .build()
            .unwrap();

        assert_eq!(request.price, dec!(1.10012));
        // 50 pips = 0.00500 on a 5-digit symbol
        assert_eq!(request.stop_loss, dec!(1.09512));
        assert_eq!(request.take_profit, dec!(1.11012));
        assert_eq!(request.magic, 77);
    }

    #[test]
    fn test_sell_enters_at_bid_with_mirrored_offsets() {
        let symbol = eurusd();
        let request = OrderBuilder::new(&symbol, OrderSide::Sell, tick())
            .volume(dec!(0.10))
            .stop_loss_pips(Some(dec!(50)))
            .take_profit_pips(Some(dec!(100)))
            .build()
            .unwrap();

        assert_eq!(request.price, dec!(1.10000));
        assert_eq!(request.stop_loss, dec!(1.10500));
        assert_eq!(request.take_profit, dec!(1.09000));
    }

    #[test]
    fn test_omitted_distances_stay_unset() {
        let symbol = eurusd();
        let request = OrderBuilder::new(&symbol, OrderSide::Buy, tick())
            .volume(dec!(0.10))
            .build()
            .unwrap();

        assert_eq!(request.stop_loss, Decimal::ZERO);
        assert_eq!(request.take_profit, Decimal::ZERO);
        assert!(!request.has_stop_loss());
        assert!(!request.has_take_profit());
    }

    #[test]
    fn test_rejects_bad_volume() {
        let symbol = eurusd();
        assert!(matches!(
            OrderBuilder::new(&symbol, OrderSide::Buy, tick()).build(),
            Err(TradeCalcError::InvalidInput(_))
        ));
        assert!(matches!(
            OrderBuilder::new(&symbol, OrderSide::Buy, tick())
                .volume(dec!(0.015))
                .build(),
            Err(TradeCalcError::ConstraintViolation(_))
        ));
        assert!(matches!(
            OrderBuilder::new(&symbol, OrderSide::Buy, tick())
                .volume(dec!(101))
                .build(),
            Err(TradeCalcError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_distances() {
        let symbol = eurusd();
        assert!(matches!(
            OrderBuilder::new(&symbol, OrderSide::Buy, tick())
                .volume(dec!(0.10))
                .stop_loss_pips(Some(dec!(0)))
                .build(),
            Err(TradeCalcError::InvalidInput(_))
        ));
    }
}
