//! Wire-level payloads for the terminal bridge.
//!
//! The bridge mirrors the MT5 client API over JSON; these structs are the
//! request/response shapes, kept separate from the domain models they map
//! into.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body for `POST /connect`.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectRequest {
    pub login: u64,
    pub password: String,
    pub server: String,
    pub timeout_ms: u64,
}

/// Response from `POST /connect`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectResponse {
    /// Bearer token scoped to this terminal session
    pub token: String,
    pub login: u64,
    pub server: String,
}

/// Response from `GET /account`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResponse {
    pub login: u64,
    pub server: String,
    pub currency: String,
    pub balance: Decimal,
    pub equity: Decimal,
    pub leverage: u32,
}

/// Response from `GET /symbols/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolInfoResponse {
    pub name: String,
    pub digits: u32,
    pub point: Decimal,
    pub volume_min: Decimal,
    pub volume_max: Decimal,
    pub volume_step: Decimal,
    /// P&L change per tick movement for one lot
    pub trade_tick_value: Decimal,
    /// Price movement of one tick
    pub trade_tick_size: Decimal,
}

/// Response from `GET /symbols/{symbol}/tick`.
#[derive(Debug, Clone, Deserialize)]
pub struct TickResponse {
    /// Quote time as a Unix timestamp (seconds)
    pub time: i64,
    pub bid: Decimal,
    pub ask: Decimal,
}

/// One bar in the `GET /bars` response.
#[derive(Debug, Clone, Deserialize)]
pub struct BarResponse {
    /// Bar open time as a Unix timestamp (seconds)
    pub time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub tick_volume: u64,
}

/// One position in the `GET /positions` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionResponse {
    pub ticket: u64,
    pub symbol: String,
    /// "BUY" or "SELL"
    pub side: String,
    pub volume: Decimal,
    pub price_open: Decimal,
    pub price_current: Decimal,
    pub profit: Decimal,
    pub swap: Decimal,
    pub magic: u64,
    #[serde(default)]
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_symbol_info_payload() {
        let payload = r#"{
            "name": "EURUSD",
            "digits": 5,
            "point": 0.00001,
            "volume_min": 0.01,
            "volume_max": 100.0,
            "volume_step": 0.01,
            "trade_tick_value": 1.0,
            "trade_tick_size": 0.00001
        }"#;

        let info: SymbolInfoResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(info.name, "EURUSD");
        assert_eq!(info.point, dec!(0.00001));
        assert_eq!(info.volume_step, dec!(0.01));
    }

    #[test]
    fn test_position_payload_with_missing_comment() {
        let payload = r#"{
            "ticket": 1042,
            "symbol": "EURUSD",
            "side": "BUY",
            "volume": 0.33,
            "price_open": 1.10012,
            "price_current": 1.10100,
            "profit": 29.04,
            "swap": -0.12,
            "magic": 220814
        }"#;

        let position: PositionResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(position.volume, dec!(0.33));
        assert!(position.comment.is_empty());
    }

    #[test]
    fn test_bar_payload() {
        let payload = r#"[
            {"time": 1718000000, "open": 1.1, "high": 1.2, "low": 1.05, "close": 1.15, "tick_volume": 320}
        ]"#;

        let bars: Vec<BarResponse> = serde_json::from_str(payload).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, dec!(1.15));
    }
}
