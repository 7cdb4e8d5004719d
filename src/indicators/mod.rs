//! Price-series indicators used by the signal evaluator and the CLI.

mod rsi;
mod sma;

pub use rsi::rsi;
pub use sma::sma;
