//! Bot runner: the crossover polling loop.
//!
//! Each cycle fetches a fresh bar window, evaluates the SMA crossover, and
//! acts on the result:
//! - Buy/Sell with no open position: size the lot, build the order, submit.
//! - Signal opposite to the open position: close it.
//! - Hold, or a signal matching the open side: nothing.
//!
//! The loop is a scheduled task with an explicit stop signal; bridge errors
//! and skipped trades are logged and the next cycle proceeds.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::api::{DataClient, TerminalSession, TradeClient};
use crate::models::{closes, OpenPosition, OrderSide, Timeframe};
use crate::trading::{
    OrderBuilder, PositionSizer, Signal, SmaCrossover, TradeCalcError, TradingConfig,
};

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Symbol to trade
    pub symbol: String,

    /// Bar timeframe the crossover is evaluated on
    pub timeframe: Timeframe,

    /// Polling interval in seconds
    pub poll_interval_secs: u64,

    /// Whether to log intended orders instead of submitting them
    pub dry_run: bool,

    /// Sizing and order parameters
    pub trading: TradingConfig,
}

/// Counters accumulated over one bot run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BotStats {
    pub cycles: u64,
    pub signals: u64,
    pub orders_sent: u64,
    pub positions_closed: u64,
    pub trades_skipped: u64,
}

impl fmt::Display for BotStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Session Summary ===")?;
        writeln!(f, "Cycles:            {}", self.cycles)?;
        writeln!(f, "Signals:           {}", self.signals)?;
        writeln!(f, "Orders sent:       {}", self.orders_sent)?;
        writeln!(f, "Positions closed:  {}", self.positions_closed)?;
        write!(f, "Trades skipped:    {}", self.trades_skipped)
    }
}

/// Main bot runner.
pub struct Bot {
    config: BotConfig,
    data: DataClient,
    trade: TradeClient,
    crossover: SmaCrossover,
    sizer: PositionSizer,
    stats: BotStats,
    shutdown: Arc<AtomicBool>,
}

impl Bot {
    /// Create a new bot instance, validating the crossover periods.
    pub fn new(config: BotConfig) -> Result<Self> {
        let crossover = SmaCrossover::new(config.trading.fast_period, config.trading.slow_period)
            .context("Invalid crossover configuration")?;
        let sizer = PositionSizer::new(config.trading.risk_percent);
        let data = DataClient::new()?;
        let trade = TradeClient::new()?;

        Ok(Self {
            config,
            data,
            trade,
            crossover,
            sizer,
            stats: BotStats::default(),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get the shutdown signal for external control.
    pub fn shutdown_signal(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// Counters for the run so far.
    pub fn stats(&self) -> BotStats {
        self.stats
    }

    /// Main run loop; returns after the shutdown signal is set or Ctrl-C.
    pub async fn run(&mut self, session: &TerminalSession) -> Result<()> {
        info!(
            symbol = %self.config.symbol,
            timeframe = %self.config.timeframe,
            fast = self.crossover.fast_period(),
            slow = self.crossover.slow_period(),
            dry_run = self.config.dry_run,
            poll_interval = self.config.poll_interval_secs,
            "Starting crossover loop"
        );

        let mut poll = interval(Duration::from_secs(self.config.poll_interval_secs));

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    if self.shutdown.load(Ordering::SeqCst) {
                        break;
                    }
                    if let Err(e) = self.cycle(session).await {
                        error!(error = %e, "Poll cycle failed");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    self.shutdown.store(true, Ordering::SeqCst);
                    break;
                }
            }
        }

        info!(cycles = self.stats.cycles, "Crossover loop stopped");
        Ok(())
    }

    /// Single iteration: fetch, evaluate, act.
    async fn cycle(&mut self, session: &TerminalSession) -> Result<()> {
        self.stats.cycles += 1;

        let candles = self
            .data
            .bars(
                session,
                &self.config.symbol,
                self.config.timeframe,
                self.crossover.preferred_window(),
            )
            .await?;
        let series = closes(&candles);

        let signal = match self.crossover.evaluate(&series) {
            Ok(signal) => signal,
            Err(TradeCalcError::InsufficientData { required, actual }) => {
                warn!(required, actual, "Not enough bars yet, holding");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        debug!(signal = signal.as_str(), "Evaluated crossover");

        let side = match signal {
            Signal::Buy => OrderSide::Buy,
            Signal::Sell => OrderSide::Sell,
            Signal::Hold => return Ok(()),
        };
        self.stats.signals += 1;

        // Only this bot's position in this symbol counts.
        let open = self.own_position(session).await?;

        match open {
            Some(position) if position.is_closed_by(side) => {
                self.close(session, &position).await
            }
            Some(position) => {
                debug!(
                    ticket = position.ticket,
                    side = position.side.as_str(),
                    "Signal matches open position, holding"
                );
                Ok(())
            }
            None => self.enter(session, side).await,
        }
    }

    /// Look up the position this bot opened, if any.
    async fn own_position(&self, session: &TerminalSession) -> Result<Option<OpenPosition>> {
        let positions = self
            .data
            .open_positions(session, Some(&self.config.symbol))
            .await?;

        Ok(positions
            .into_iter()
            .find(|p| p.magic == self.config.trading.magic))
    }

    /// Size, build, and submit an entry order.
    async fn enter(&mut self, session: &TerminalSession, side: OrderSide) -> Result<()> {
        let account = self.data.account_info(session).await?;
        let symbol = self.data.symbol_info(session, &self.config.symbol).await?;
        let tick = self.data.tick(session, &self.config.symbol).await?;

        let volume = match self
            .sizer
            .lot_size(account.balance, self.config.trading.sl_pips, &symbol)
        {
            Ok(volume) => volume,
            Err(TradeCalcError::ConstraintViolation(reason)) => {
                warn!(reason = %reason, "Skipping trade");
                self.stats.trades_skipped += 1;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let request = OrderBuilder::new(&symbol, side, tick)
            .volume(volume)
            .stop_loss_pips(Some(self.config.trading.sl_pips))
            .take_profit_pips(self.config.trading.tp_pips)
            .deviation(self.config.trading.deviation)
            .magic(self.config.trading.magic)
            .comment(self.config.trading.comment.clone())
            .build()?;

        if self.config.dry_run {
            info!(
                symbol = %request.symbol,
                side = request.side.as_str(),
                volume = %request.volume,
                price = %request.price,
                sl = %request.stop_loss,
                tp = %request.take_profit,
                "[DRY RUN] Would submit order"
            );
            return Ok(());
        }

        let result = self.trade.send_order(session, &request).await?;
        if result.success {
            self.stats.orders_sent += 1;
            info!(
                ticket = result.ticket,
                price = %result.price,
                side = request.side.as_str(),
                volume = %request.volume,
                "Order executed"
            );
        } else {
            warn!(message = %result.message, "Order rejected");
        }

        Ok(())
    }

    /// Close a position the signal turned against.
    async fn close(&mut self, session: &TerminalSession, position: &OpenPosition) -> Result<()> {
        if self.config.dry_run {
            info!(
                ticket = position.ticket,
                side = position.side.as_str(),
                profit = %position.net_profit(),
                "[DRY RUN] Would close position"
            );
            return Ok(());
        }

        let result = self
            .trade
            .close_position(
                session,
                position.ticket,
                self.config.trading.deviation,
                &self.config.trading.comment,
            )
            .await?;

        if result.success {
            self.stats.positions_closed += 1;
            info!(
                ticket = position.ticket,
                price = %result.price,
                "Position closed"
            );
        } else {
            warn!(
                ticket = position.ticket,
                message = %result.message,
                "Close rejected"
            );
        }

        Ok(())
    }
}
