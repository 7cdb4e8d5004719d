//! Trading configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Configuration for sizing and order construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Percentage of balance risked per trade (1.0 means 1%)
    pub risk_percent: Decimal,

    /// Stop-loss distance in pips
    pub sl_pips: Decimal,

    /// Take-profit distance in pips, None for no target
    pub tp_pips: Option<Decimal>,

    /// Fast moving-average period
    pub fast_period: usize,

    /// Slow moving-average period
    pub slow_period: usize,

    /// Maximum acceptable slippage in points
    pub deviation: u32,

    /// Identifier tag attached to every order this bot places
    pub magic: u64,

    /// Comment attached to every order
    pub comment: String,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            risk_percent: dec!(1.0),   // 1% of balance per trade
            sl_pips: dec!(30),
            tp_pips: Some(dec!(60)),   // 2:1 reward-to-risk
            fast_period: 10,
            slow_period: 30,
            deviation: 20,
            magic: 220_814,
            comment: "crossbot".to_string(),
        }
    }
}
