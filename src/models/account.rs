//! Account summary reported by the terminal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trading account state at the time of the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account number at the broker
    pub login: u64,

    /// Broker server name (e.g., "Broker-Demo")
    pub server: String,

    /// Deposit currency (e.g., "USD")
    pub currency: String,

    /// Account balance, excluding open-position P&L
    pub balance: Decimal,

    /// Balance plus floating P&L of open positions
    pub equity: Decimal,

    /// Account leverage denominator (100 means 1:100)
    pub leverage: u32,
}

impl AccountInfo {
    /// Floating P&L currently carried by open positions.
    pub fn floating_pnl(&self) -> Decimal {
        self.equity - self.balance
    }
}
