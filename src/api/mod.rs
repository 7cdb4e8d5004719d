//! Terminal bridge API clients: session lifecycle, market data, and trading.

mod data_client;
mod session;
mod trade_client;
mod types;

pub use data_client::DataClient;
pub use session::{TerminalConfig, TerminalSession};
pub use trade_client::TradeClient;
pub use types::*;
