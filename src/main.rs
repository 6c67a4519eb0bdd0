//! Pairs Spread Bot - Entry Point
//!
//! Initializes configuration, logging, the brokerage client, and the
//! interactive startup dialogue, then runs the trading loop until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (structured logging)
//! 3. Create BrokerClient from BROKER_API_TOKEN
//! 4. List accounts, take the first as the trading account
//! 5. Load the instrument catalog
//! 6. Operator dialogue: pick a pair, review the portfolio, set thresholds
//! 7. Spawn the trading loop
//! 8. Wait for SIGINT → graceful shutdown

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::broker::catalog::BrokerCatalog;
use adapters::broker::client::{BrokerClient, BrokerClientConfig};
use adapters::broker::market_data::BrokerMarketData;
use adapters::broker::orders::BrokerOrders;
use adapters::broker::portfolio::BrokerPortfolio;
use adapters::console;
use domain::engine::SpreadEngine;
use domain::instrument::PairInstruments;
use ports::catalog::InstrumentCatalog;
use ports::portfolio::PortfolioSource;
use usecases::trading_loop::TradingLoop;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured logging ────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.bot.log_level)
                }),
        )
        .init();

    info!(
        name = %config.bot.name,
        version = env!("CARGO_PKG_VERSION"),
        pairs = config.pairs.len(),
        "Starting pairs spread bot"
    );

    // ── 3. Brokerage client from env token ──────────────────
    let client_config = BrokerClientConfig {
        base_url: config.api.base_url.clone(),
        timeout: Duration::from_secs(config.api.timeout_seconds),
    };
    let client = Arc::new(
        BrokerClient::from_env(client_config)
            .context("Failed to create brokerage client")?,
    );

    // ── 4. Pick the trading account ─────────────────────────
    let accounts = client
        .accounts()
        .await
        .context("Failed to list brokerage accounts")?;
    let account = accounts
        .first()
        .context("Token has no brokerage accounts")?;
    info!(account = %account.id, "Trading account selected");

    // ── 5. Load the instrument catalog ──────────────────────
    let catalog = BrokerCatalog::load(&client)
        .await
        .context("Failed to load instrument catalog")?;

    // ── 6. Operator dialogue ────────────────────────────────
    let mut stdin = io::stdin().lock();
    let pair_config = console::select_pair(&mut stdin, &config.pairs)?;
    let ordinary = catalog
        .resolve_ticker(&pair_config.ordinary)
        .with_context(|| format!("unknown ticker {}", pair_config.ordinary))?;
    let preferred = catalog
        .resolve_ticker(&pair_config.preferred)
        .with_context(|| format!("unknown ticker {}", pair_config.preferred))?;
    let pair = PairInstruments {
        ordinary,
        preferred,
    };

    let portfolio = Arc::new(BrokerPortfolio::new(Arc::clone(&client)));
    let snapshot = portfolio
        .snapshot(&account.id)
        .await
        .context("Failed to fetch the initial portfolio")?;
    console::print_portfolio(&snapshot, &pair);

    let band = console::prompt_thresholds(&mut stdin)?;
    info!(lower = %band.lower(), upper = %band.upper(), "Thresholds set");

    // ── 7. Wire and spawn the trading loop ──────────────────
    let engine = SpreadEngine::new(band, config.engine.cash_margin);
    let schedule = config.schedule.to_schedule()?;
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    let mut trading_loop = TradingLoop::new(
        Arc::new(BrokerMarketData::new(Arc::clone(&client))),
        portfolio,
        Arc::new(BrokerOrders::new(Arc::clone(&client))),
        engine,
        pair,
        account.id.clone(),
        schedule,
        config.retry.policy(),
        config.cadence.intervals(),
        shutdown_rx,
    );
    let loop_handle = tokio::spawn(async move {
        if let Err(e) = trading_loop.run().await {
            error!(error = %e, "Trading loop failed");
        }
    });

    // ── 8. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c().await.context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    let _ = shutdown_tx.send(());
    let _ = tokio::time::timeout(Duration::from_secs(30), loop_handle).await;

    info!("Shutdown complete");
    Ok(())
}
