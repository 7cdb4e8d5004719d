//! Write-side terminal bridge operations: order submission and position
//! close.
//!
//! The bridge owns routing and fill semantics; a rejected request comes back
//! as a retcode other than "done" and is surfaced as a failed
//! [`TradeResult`], never retried or reinterpreted here.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{OrderRequest, OrderSide, TradeResult};

use super::session::TerminalSession;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Terminal retcode for a completed deal.
const RETCODE_DONE: u32 = 10009;

/// Body for `POST /orders`.
#[derive(Debug, Clone, Serialize)]
struct OrderSendRequest {
    action: &'static str,
    symbol: String,
    side: OrderSide,
    volume: Decimal,
    price: Decimal,
    sl: Decimal,
    tp: Decimal,
    deviation: u32,
    magic: u64,
    comment: String,
    type_time: &'static str,
    type_filling: &'static str,
}

/// Body for `POST /positions/{ticket}/close`.
#[derive(Debug, Clone, Serialize)]
struct ClosePositionRequest {
    deviation: u32,
    comment: String,
}

/// Terminal execution outcome, shared by order send and close.
#[derive(Debug, Clone, Deserialize)]
struct TradeResultResponse {
    retcode: u32,
    #[serde(default)]
    order: u64,
    #[serde(default)]
    price: Decimal,
    #[serde(default)]
    comment: String,
}

/// Client for the bridge's trading endpoints.
pub struct TradeClient {
    client: Client,
}

impl TradeClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Submit a market order.
    pub async fn send_order(
        &self,
        session: &TerminalSession,
        request: &OrderRequest,
    ) -> Result<TradeResult> {
        let url = format!("{}/orders", session.base_url());
        let body = OrderSendRequest {
            action: "DEAL",
            symbol: request.symbol.clone(),
            side: request.side,
            volume: request.volume,
            price: request.price,
            sl: request.stop_loss,
            tp: request.take_profit,
            deviation: request.deviation,
            magic: request.magic,
            comment: request.comment.clone(),
            type_time: "GTC",
            type_filling: "IOC",
        };

        debug!(
            symbol = %request.symbol,
            side = request.side.as_str(),
            volume = %request.volume,
            "Submitting order"
        );

        let response = self.post_json(session, &url, &body).await?;
        Ok(Self::map_result(response, "Order"))
    }

    /// Close an open position by ticket.
    pub async fn close_position(
        &self,
        session: &TerminalSession,
        ticket: u64,
        deviation: u32,
        comment: &str,
    ) -> Result<TradeResult> {
        let url = format!("{}/positions/{}/close", session.base_url(), ticket);
        let body = ClosePositionRequest {
            deviation,
            comment: comment.to_string(),
        };

        debug!(ticket = ticket, "Closing position");

        let response = self.post_json(session, &url, &body).await?;
        Ok(Self::map_result(response, "Close"))
    }

    fn map_result(response: TradeResultResponse, what: &str) -> TradeResult {
        if response.retcode != RETCODE_DONE {
            return TradeResult::failed(format!(
                "{} failed: {} (code: {})",
                what, response.comment, response.retcode
            ));
        }

        TradeResult {
            success: true,
            ticket: response.order,
            price: response.price,
            message: format!("{} executed at {}", what, response.price),
        }
    }

    async fn post_json<B: Serialize>(
        &self,
        session: &TerminalSession,
        url: &str,
        body: &B,
    ) -> Result<TradeResultResponse> {
        let response = self
            .client
            .post(url)
            .bearer_auth(session.token())
            .json(body)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Bridge request failed: {} - {}", status, text);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_done_retcode_maps_to_success() {
        let result = TradeClient::map_result(
            TradeResultResponse {
                retcode: RETCODE_DONE,
                order: 1042,
                price: dec!(1.10012),
                comment: "done".to_string(),
            },
            "Order",
        );

        assert!(result.success);
        assert_eq!(result.ticket, 1042);
        assert_eq!(result.price, dec!(1.10012));
    }

    #[test]
    fn test_rejection_passes_message_through() {
        let result = TradeClient::map_result(
            TradeResultResponse {
                retcode: 10019,
                order: 0,
                price: Decimal::ZERO,
                comment: "No money".to_string(),
            },
            "Order",
        );

        assert!(!result.success);
        assert_eq!(result.ticket, 0);
        assert!(result.message.contains("No money"));
        assert!(result.message.contains("10019"));
    }
}
