//! Broker symbol constraints and live quotes.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Trading constraints and price economics for one symbol.
///
/// Supplied by the terminal; immutable for the duration of an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSpec {
    /// Symbol name (e.g., "EURUSD")
    pub name: String,

    /// Number of decimal digits in quoted prices
    pub digits: u32,

    /// Smallest quoted price increment (e.g., 0.00001 for a 5-digit symbol)
    pub point: Decimal,

    /// Minimum order volume in lots
    pub min_lot: Decimal,

    /// Maximum order volume in lots
    pub max_lot: Decimal,

    /// Volume must be a multiple of this step
    pub lot_step: Decimal,

    /// Account-currency value of a one-pip move for one lot
    pub pip_value_per_lot: Decimal,
}

impl SymbolSpec {
    /// Price distance of one pip.
    ///
    /// Fractional quoting (5- and 3-digit symbols) puts the pip at ten
    /// points; classic 4- and 2-digit quoting puts it at one point.
    pub fn pip_size(&self) -> Decimal {
        match self.digits {
            5 | 3 => self.point * dec!(10),
            _ => self.point,
        }
    }

    /// Round a price to the symbol's quoted precision, half away from zero.
    pub fn quantize_price(&self, price: Decimal) -> Decimal {
        price.round_dp_with_strategy(self.digits, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Latest bid/ask quote for a symbol.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tick {
    /// Quote time (UTC)
    pub time: DateTime<Utc>,

    pub bid: Decimal,
    pub ask: Decimal,
}

impl Tick {
    /// Bid/ask spread expressed in pips of the given symbol.
    pub fn spread_pips(&self, symbol: &SymbolSpec) -> Decimal {
        let pip = symbol.pip_size();
        if pip.is_zero() {
            return Decimal::ZERO;
        }
        (self.ask - self.bid) / pip
    }
}
