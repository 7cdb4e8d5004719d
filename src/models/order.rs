//! Order request and execution result models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }

    /// The side that closes a position opened on this side.
    pub fn opposite(&self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

/// A fully specified market-order request.
///
/// Constructed once by the order builder and handed to the execution client;
/// never mutated afterwards. A `stop_loss` or `take_profit` of zero means
/// "not set".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol to trade (e.g., "EURUSD")
    pub symbol: String,

    /// Order direction
    pub side: OrderSide,

    /// Volume in lots
    pub volume: Decimal,

    /// Requested fill price (ask for BUY, bid for SELL)
    pub price: Decimal,

    /// Absolute stop-loss price, zero when unset
    pub stop_loss: Decimal,

    /// Absolute take-profit price, zero when unset
    pub take_profit: Decimal,

    /// Maximum acceptable slippage in points
    pub deviation: u32,

    /// Identifier tag for later programmatic lookup of the order's positions
    pub magic: u64,

    /// Free-form order comment
    pub comment: String,
}

impl OrderRequest {
    pub fn has_stop_loss(&self) -> bool {
        !self.stop_loss.is_zero()
    }

    pub fn has_take_profit(&self) -> bool {
        !self.take_profit.is_zero()
    }
}

/// Outcome of an order submission or position close.
///
/// Produced by the execution collaborator and passed through unchanged; a
/// rejected order is `success == false` with the terminal's message, never an
/// error on our side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeResult {
    /// Whether the terminal accepted and filled the request
    pub success: bool,

    /// Ticket of the resulting order, zero on failure
    pub ticket: u64,

    /// Actual fill price, zero on failure
    pub price: Decimal,

    /// Human-readable outcome description from the terminal
    pub message: String,
}

impl TradeResult {
    /// A failure result constructed on the client side (e.g., transport refused).
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ticket: 0,
            price: Decimal::ZERO,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_opposite() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
    }

    #[test]
    fn test_zero_sentinels() {
        let request = OrderRequest {
            symbol: "EURUSD".to_string(),
            side: OrderSide::Buy,
            volume: dec!(0.10),
            price: dec!(1.10012),
            stop_loss: Decimal::ZERO,
            take_profit: dec!(1.10512),
            deviation: 20,
            magic: 0,
            comment: String::new(),
        };

        assert!(!request.has_stop_loss());
        assert!(request.has_take_profit());
    }
}
