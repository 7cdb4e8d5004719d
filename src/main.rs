//! MT5 SMA-Crossover Trading Bot
//!
//! Connects to a MetaTrader 5 terminal through a local HTTP bridge, sizes
//! positions from an account risk budget, and trades fast/slow SMA
//! crossovers with optional stop-loss and take-profit.

mod api;
mod bot;
mod indicators;
mod models;
mod trading;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::api::{DataClient, TerminalConfig, TerminalSession, TradeClient};
use crate::bot::{Bot, BotConfig};
use crate::indicators::rsi;
use crate::models::{closes, Timeframe};
use crate::trading::{PositionSizer, SmaCrossover, TradingConfig};

/// MT5 crossover bot CLI.
#[derive(Parser)]
#[command(name = "crossbot")]
#[command(about = "SMA-crossover trading against a MetaTrader 5 terminal", long_about = None)]
struct Cli {
    /// Terminal bridge URL
    #[arg(long, env = "MT5_BRIDGE_URL", default_value = "http://127.0.0.1:8228")]
    bridge_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the account summary
    Account,

    /// Fetch OHLCV bars
    Bars {
        /// Trading symbol (e.g., EURUSD)
        #[arg(short, long)]
        symbol: String,

        /// Bar timeframe (M1, M5, M15, M30, H1, H4, D1)
        #[arg(short, long, default_value = "H1")]
        timeframe: Timeframe,

        /// Number of bars to fetch
        #[arg(short, long, default_value = "10")]
        count: usize,
    },

    /// Show the latest bid/ask quote
    Tick {
        /// Trading symbol
        #[arg(short, long)]
        symbol: String,
    },

    /// List open positions
    Positions {
        /// Filter to one symbol
        #[arg(short, long)]
        symbol: Option<String>,
    },

    /// Recommend a lot size for a risk budget
    Size {
        /// Trading symbol
        #[arg(short, long)]
        symbol: String,

        /// Risk per trade in percent of balance
        #[arg(short, long, default_value = "1.0")]
        risk: Decimal,

        /// Stop-loss distance in pips
        #[arg(long, default_value = "30")]
        sl_pips: Decimal,

        /// Balance override (defaults to the account balance)
        #[arg(short, long)]
        balance: Option<Decimal>,
    },

    /// Evaluate the crossover once
    Signal {
        /// Trading symbol
        #[arg(short, long)]
        symbol: String,

        /// Bar timeframe
        #[arg(short, long, default_value = "M15")]
        timeframe: Timeframe,

        /// Fast moving-average period
        #[arg(long, default_value = "10")]
        fast: usize,

        /// Slow moving-average period
        #[arg(long, default_value = "30")]
        slow: usize,
    },

    /// Show recent RSI values
    Rsi {
        /// Trading symbol
        #[arg(short, long)]
        symbol: String,

        /// Bar timeframe
        #[arg(short, long, default_value = "H1")]
        timeframe: Timeframe,

        /// RSI lookback period
        #[arg(short, long, default_value = "14")]
        period: usize,

        /// Number of bars to fetch
        #[arg(short, long, default_value = "100")]
        count: usize,
    },

    /// Close a position by ticket
    Close {
        /// Position ticket
        ticket: u64,

        /// Order comment
        #[arg(long, default_value = "")]
        comment: String,
    },

    /// Run the crossover bot loop
    Run {
        /// Trading symbol
        #[arg(short, long)]
        symbol: String,

        /// Bar timeframe
        #[arg(short, long, default_value = "M15")]
        timeframe: Timeframe,

        /// Fast moving-average period
        #[arg(long, default_value = "10")]
        fast: usize,

        /// Slow moving-average period
        #[arg(long, default_value = "30")]
        slow: usize,

        /// Risk per trade in percent of balance
        #[arg(short, long, default_value = "1.0")]
        risk: Decimal,

        /// Stop-loss distance in pips
        #[arg(long, default_value = "30")]
        sl_pips: Decimal,

        /// Take-profit distance in pips (omit for no target)
        #[arg(long)]
        tp_pips: Option<Decimal>,

        /// Polling interval in seconds
        #[arg(short, long, default_value = "60")]
        interval: u64,

        /// Log intended orders instead of submitting them
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Acquire the terminal session up front; every command needs it.
    let config = TerminalConfig::from_env(cli.bridge_url.clone())?;
    let session = TerminalSession::connect(&config).await?;

    let data = DataClient::new()?;

    match cli.command {
        Commands::Account => {
            let account = data.account_info(&session).await?;

            println!("\n=== Account ===");
            println!("Login:     {}", account.login);
            println!("Server:    {}", account.server);
            println!("Currency:  {}", account.currency);
            println!("Balance:   {:.2}", account.balance);
            println!("Equity:    {:.2}", account.equity);
            println!("Floating:  {:.2}", account.floating_pnl());
            println!("Leverage:  1:{}", account.leverage);
        }

        Commands::Bars {
            symbol,
            timeframe,
            count,
        } => {
            let candles = data.bars(&session, &symbol, timeframe, count).await?;

            if candles.is_empty() {
                println!("No bars received for {}.", symbol);
            } else {
                println!(
                    "\n{:<20} {:>10} {:>10} {:>10} {:>10} {:>8}",
                    "TIME", "OPEN", "HIGH", "LOW", "CLOSE", "TICKS"
                );
                println!("{}", "-".repeat(74));

                for candle in &candles {
                    println!(
                        "{:<20} {:>10} {:>10} {:>10} {:>10} {:>8}",
                        candle.time.format("%Y-%m-%d %H:%M"),
                        candle.open,
                        candle.high,
                        candle.low,
                        candle.close,
                        candle.tick_volume
                    );
                }
            }
        }

        Commands::Tick { symbol } => {
            let spec = data.symbol_info(&session, &symbol).await?;
            let tick = data.tick(&session, &symbol).await?;

            println!("\n=== {} ===", symbol);
            println!("Time:    {}", tick.time.format("%Y-%m-%d %H:%M:%S"));
            println!("Bid:     {}", tick.bid);
            println!("Ask:     {}", tick.ask);
            println!("Spread:  {:.1} pips", tick.spread_pips(&spec));
        }

        Commands::Positions { symbol } => {
            let positions = data.open_positions(&session, symbol.as_deref()).await?;

            if positions.is_empty() {
                println!("No open positions.");
            } else {
                println!(
                    "\n{:<10} {:<10} {:<5} {:>8} {:>10} {:>10} {:>10}",
                    "TICKET", "SYMBOL", "SIDE", "VOLUME", "OPEN", "CURRENT", "P&L"
                );
                println!("{}", "-".repeat(70));

                for pos in &positions {
                    println!(
                        "{:<10} {:<10} {:<5} {:>8} {:>10} {:>10} {:>10.2}",
                        pos.ticket,
                        pos.symbol,
                        pos.side.as_str(),
                        pos.volume,
                        pos.open_price,
                        pos.current_price,
                        pos.net_profit()
                    );
                }
            }
        }

        Commands::Size {
            symbol,
            risk,
            sl_pips,
            balance,
        } => {
            let spec = data.symbol_info(&session, &symbol).await?;
            let balance = match balance {
                Some(b) => b,
                None => data.account_info(&session).await?.balance,
            };

            let lots = PositionSizer::new(risk).lot_size(balance, sl_pips, &spec)?;

            println!("\n=== Position Size ===");
            println!("Symbol:        {}", symbol);
            println!("Balance:       {:.2}", balance);
            println!("Risk:          {}%", risk);
            println!("Stop-loss:     {} pips", sl_pips);
            println!("Pip value/lot: {}", spec.pip_value_per_lot);
            println!("Recommended:   {} lots", lots);
        }

        Commands::Signal {
            symbol,
            timeframe,
            fast,
            slow,
        } => {
            let crossover = SmaCrossover::new(fast, slow)?;
            let candles = data
                .bars(&session, &symbol, timeframe, crossover.preferred_window())
                .await?;
            let series = closes(&candles);
            let signal = crossover.evaluate(&series)?;

            let last_close = series.last().copied().unwrap_or_default();
            println!(
                "{} {} SMA({}/{}): {} (last close {})",
                symbol,
                timeframe,
                fast,
                slow,
                signal.as_str(),
                last_close
            );
        }

        Commands::Rsi {
            symbol,
            timeframe,
            period,
            count,
        } => {
            let candles = data.bars(&session, &symbol, timeframe, count).await?;
            let series = closes(&candles);
            let values = rsi(&series, period)?;

            println!("\n{:<20} {:>10} {:>8}", "TIME", "CLOSE", "RSI");
            println!("{}", "-".repeat(40));

            // Tail of the series is what anyone actually looks at.
            let tail = candles.len().saturating_sub(10);
            for (candle, value) in candles.iter().zip(values.iter()).skip(tail) {
                let rendered = match value {
                    Some(v) => format!("{:.1}", v),
                    None => "-".to_string(),
                };
                println!(
                    "{:<20} {:>10} {:>8}",
                    candle.time.format("%Y-%m-%d %H:%M"),
                    candle.close,
                    rendered
                );
            }
        }

        Commands::Close { ticket, comment } => {
            let trade = TradeClient::new()?;
            let result = trade
                .close_position(&session, ticket, 20, &comment)
                .await?;

            if result.success {
                println!("Closed {} at {}", ticket, result.price);
            } else {
                println!("Close failed: {}", result.message);
            }
        }

        Commands::Run {
            symbol,
            timeframe,
            fast,
            slow,
            risk,
            sl_pips,
            tp_pips,
            interval,
            dry_run,
        } => {
            info!(
                symbol = %symbol,
                interval = interval,
                dry_run = dry_run,
                "Starting crossover bot"
            );

            let bot_config = BotConfig {
                symbol: symbol.clone(),
                timeframe,
                poll_interval_secs: interval,
                dry_run,
                trading: TradingConfig {
                    risk_percent: risk,
                    sl_pips,
                    tp_pips,
                    fast_period: fast,
                    slow_period: slow,
                    ..TradingConfig::default()
                },
            };

            let mut bot = Bot::new(bot_config).context("Failed to configure bot")?;

            println!("\n=== MT5 Crossover Bot ===");
            println!("Symbol: {} {}", symbol, timeframe);
            println!("SMA periods: {}/{}", fast, slow);
            println!("Risk: {}% per trade, SL {} pips", risk, sl_pips);
            println!(
                "Mode: {}",
                if dry_run {
                    "DRY RUN (no real orders)"
                } else {
                    "LIVE TRADING"
                }
            );
            println!("\nPress Ctrl+C to stop.\n");

            if let Err(e) = bot.run(&session).await {
                tracing::error!(error = %e, "Bot error");
            }

            println!("\n{}", bot.stats());
        }
    }

    session.disconnect().await?;

    Ok(())
}
