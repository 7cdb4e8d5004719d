//! Trading logic: position sizing, order construction, crossover signals.

mod config;
mod error;
mod order_builder;
mod position_sizer;
mod signal;

pub use config::TradingConfig;
pub use error::{TradeCalcError, TradeCalcResult};
pub use order_builder::OrderBuilder;
pub use position_sizer::PositionSizer;
pub use signal::{Signal, SmaCrossover};
