//! Terminal session lifecycle.
//!
//! The session handle is acquired once at startup, owned by the caller, and
//! passed by reference into the API clients; dropping it without calling
//! [`TerminalSession::disconnect`] leaves the bridge to reap the session on
//! its own timeout. No process-global terminal state exists on our side.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;

use super::types::{ConnectRequest, ConnectResponse};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 60_000;

/// Connection parameters for the terminal bridge.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Base URL of the bridge (e.g., "http://127.0.0.1:8228")
    pub base_url: String,

    /// Account number to log in with
    pub login: u64,

    /// Account password
    pub password: String,

    /// Broker server name
    pub server: String,

    /// Terminal-side connect timeout in milliseconds
    pub timeout_ms: u64,
}

impl TerminalConfig {
    /// Build from credentials in the environment (`MT5_LOGIN`,
    /// `MT5_PASSWORD`, `MT5_SERVER`) and the given bridge URL.
    pub fn from_env(base_url: impl Into<String>) -> Result<Self> {
        let login = env::var("MT5_LOGIN")
            .context("MT5_LOGIN not set")?
            .parse::<u64>()
            .context("MT5_LOGIN is not a number")?;
        let password = env::var("MT5_PASSWORD").context("MT5_PASSWORD not set")?;
        let server = env::var("MT5_SERVER").context("MT5_SERVER not set")?;

        Ok(Self {
            base_url: base_url.into(),
            login,
            password,
            server,
            timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        })
    }
}

/// An authenticated session with the terminal bridge.
pub struct TerminalSession {
    http: Client,
    base_url: String,
    token: String,
    login: u64,
    server: String,
}

impl TerminalSession {
    /// Connect to the terminal and authenticate.
    pub async fn connect(config: &TerminalConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        let url = format!("{}/connect", config.base_url);
        let body = ConnectRequest {
            login: config.login,
            password: config.password.clone(),
            server: config.server.clone(),
            timeout_ms: config.timeout_ms,
        };

        let response = http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to reach terminal bridge")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Terminal connect failed: {} - {}", status, body);
        }

        let connected: ConnectResponse = response
            .json()
            .await
            .context("Failed to parse connect response")?;

        info!(
            login = connected.login,
            server = %connected.server,
            "Connected to terminal"
        );

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            token: connected.token,
            login: connected.login,
            server: connected.server,
        })
    }

    /// End the session on the bridge, consuming the handle.
    pub async fn disconnect(self) -> Result<()> {
        let url = format!("{}/disconnect", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .context("Failed to reach terminal bridge")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Terminal disconnect failed: {}", status);
        }

        info!(login = self.login, server = %self.server, "Disconnected from terminal");
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
