//! Read-only terminal bridge operations: account, symbols, quotes, bars,
//! and open positions.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{AccountInfo, Candle, OpenPosition, OrderSide, SymbolSpec, Tick, Timeframe};

use super::session::TerminalSession;
use super::types::*;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the bridge's read-only endpoints.
pub struct DataClient {
    client: Client,
}

impl DataClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch the account summary.
    pub async fn account_info(&self, session: &TerminalSession) -> Result<AccountInfo> {
        let url = format!("{}/account", session.base_url());

        debug!(url = %url, "Fetching account info");

        let response: AccountInfoResponse = self.get_json(session, &url).await?;

        Ok(AccountInfo {
            login: response.login,
            server: response.server,
            currency: response.currency,
            balance: response.balance,
            equity: response.equity,
            leverage: response.leverage,
        })
    }

    /// Fetch trading constraints and pip economics for a symbol.
    pub async fn symbol_info(&self, session: &TerminalSession, symbol: &str) -> Result<SymbolSpec> {
        let url = format!("{}/symbols/{}", session.base_url(), symbol);

        debug!(url = %url, "Fetching symbol info");

        let response: SymbolInfoResponse = self.get_json(session, &url).await?;

        if response.trade_tick_size <= Decimal::ZERO {
            anyhow::bail!("Symbol {} reports a non-positive tick size", symbol);
        }

        let spec = SymbolSpec {
            name: response.name,
            digits: response.digits,
            point: response.point,
            min_lot: response.volume_min,
            max_lot: response.volume_max,
            lot_step: response.volume_step,
            pip_value_per_lot: Decimal::ZERO,
        };

        // Pip value per lot follows from the tick economics: value per tick,
        // scaled from tick size up to pip size.
        let per_tick = response.trade_tick_value / response.trade_tick_size;
        Ok(SymbolSpec {
            pip_value_per_lot: per_tick * spec.pip_size(),
            ..spec
        })
    }

    /// Fetch the latest bid/ask quote.
    pub async fn tick(&self, session: &TerminalSession, symbol: &str) -> Result<Tick> {
        let url = format!("{}/symbols/{}/tick", session.base_url(), symbol);

        debug!(url = %url, "Fetching tick");

        let response: TickResponse = self.get_json(session, &url).await?;
        let time = Utc
            .timestamp_opt(response.time, 0)
            .single()
            .context("Tick timestamp out of range")?;

        Ok(Tick {
            time,
            bid: response.bid,
            ask: response.ask,
        })
    }

    /// Fetch the most recent `count` bars, oldest first.
    pub async fn bars(
        &self,
        session: &TerminalSession,
        symbol: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/bars?symbol={}&timeframe={}&count={}",
            session.base_url(),
            symbol,
            timeframe.as_str(),
            count
        );

        debug!(url = %url, "Fetching bars");

        let items: Vec<BarResponse> = self.get_json(session, &url).await?;

        let candles = items
            .into_iter()
            .filter_map(|bar| {
                let time = Utc.timestamp_opt(bar.time, 0).single()?;
                Some(Candle {
                    time,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    tick_volume: bar.tick_volume,
                })
            })
            .collect();

        Ok(candles)
    }

    /// Fetch open positions, optionally filtered to one symbol.
    pub async fn open_positions(
        &self,
        session: &TerminalSession,
        symbol: Option<&str>,
    ) -> Result<Vec<OpenPosition>> {
        let mut url = format!("{}/positions", session.base_url());
        if let Some(s) = symbol {
            url = format!("{}?symbol={}", url, s);
        }

        debug!(url = %url, "Fetching open positions");

        let items: Vec<PositionResponse> = self.get_json(session, &url).await?;

        let positions = items
            .into_iter()
            .filter_map(|p| {
                let side = match p.side.to_uppercase().as_str() {
                    "BUY" => OrderSide::Buy,
                    "SELL" => OrderSide::Sell,
                    other => {
                        warn!(ticket = p.ticket, side = %other, "Unknown position side");
                        return None;
                    }
                };

                Some(OpenPosition {
                    ticket: p.ticket,
                    symbol: p.symbol,
                    side,
                    volume: p.volume,
                    open_price: p.price_open,
                    current_price: p.price_current,
                    profit: p.profit,
                    swap: p.swap,
                    magic: p.magic,
                    comment: p.comment,
                })
            })
            .collect();

        Ok(positions)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        session: &TerminalSession,
        url: &str,
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(session.token())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Bridge request failed: {} - {}", status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}
