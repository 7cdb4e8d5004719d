//! Open position model as reported by the terminal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::OrderSide;

/// One open position on the trading account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPosition {
    /// Position ticket, unique per account
    pub ticket: u64,

    /// Symbol the position is held in
    pub symbol: String,

    /// Direction the position was opened in
    pub side: OrderSide,

    /// Volume in lots
    pub volume: Decimal,

    /// Fill price at open
    pub open_price: Decimal,

    /// Latest market price for the symbol
    pub current_price: Decimal,

    /// Floating P&L in account currency
    pub profit: Decimal,

    /// Accumulated swap charges
    pub swap: Decimal,

    /// Identifier tag the position was opened with
    pub magic: u64,

    /// Comment carried over from the opening order
    #[serde(default)]
    pub comment: String,
}

impl OpenPosition {
    /// Floating P&L including swap charges.
    pub fn net_profit(&self) -> Decimal {
        self.profit + self.swap
    }

    /// True if an order on the given side would close this position.
    pub fn is_closed_by(&self, side: OrderSide) -> bool {
        self.side.opposite() == side
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(side: OrderSide) -> OpenPosition {
        OpenPosition {
            ticket: 1042,
            symbol: "EURUSD".to_string(),
            side,
            volume: dec!(0.33),
            open_price: dec!(1.10012),
            current_price: dec!(1.10100),
            profit: dec!(29.04),
            swap: dec!(-0.12),
            magic: 77,
            comment: "crossbot".to_string(),
        }
    }

    #[test]
    fn test_net_profit_includes_swap() {
        assert_eq!(position(OrderSide::Buy).net_profit(), dec!(28.92));
    }

    #[test]
    fn test_closed_by_opposite_side() {
        let long = position(OrderSide::Buy);
        assert!(long.is_closed_by(OrderSide::Sell));
        assert!(!long.is_closed_by(OrderSide::Buy));
    }
}
