//! Data models for candles, symbols, accounts, orders, and positions.

mod account;
mod candle;
mod order;
mod position;
mod symbol;

pub use account::AccountInfo;
pub use candle::{closes, Candle, Timeframe};
pub use order::{OrderRequest, OrderSide, TradeResult};
pub use position::OpenPosition;
pub use symbol::{SymbolSpec, Tick};
