//! Configuration Module - TOML-based Bot Configuration
//!
//! Loads and validates configuration from `config.toml`. The brokerage
//! token is NOT here — it comes from the `BROKER_API_TOKEN` environment
//! variable. Everything tunable (pair catalogue, session windows, retry
//! budget, cash margin) is externalized here, nothing is hardcoded in the
//! domain layer.

pub mod loader;

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::schedule::{SessionSchedule, SessionWindow};
use crate::usecases::retry::RetryPolicy;
use crate::usecases::trading_loop::LoopIntervals;

/// Top-level bot configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the bot begins operation.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Bot identity and metadata.
    pub bot: BotConfig,
    /// Brokerage API endpoint.
    pub api: ApiConfig,
    /// The fixed catalogue of tradable pairs.
    pub pairs: Vec<PairConfig>,
    /// Decision engine parameters.
    pub engine: EngineConfig,
    /// Trading session windows.
    pub schedule: ScheduleConfig,
    /// Loop sleep intervals.
    pub cadence: CadenceConfig,
    /// Retry budget for port calls.
    pub retry: RetryConfig,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Human-readable bot name.
    pub name: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Brokerage API endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// REST API base URL.
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// One ordinary/preferred pair the operator may select.
#[derive(Debug, Clone, Deserialize)]
pub struct PairConfig {
    /// Human-readable company name shown in the selection menu.
    pub name: String,
    /// Ordinary share ticker.
    pub ordinary: String,
    /// Preferred share ticker.
    pub preferred: String,
}

/// Decision engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Fraction of cash committed on buys; the rest is held back
    /// against slippage and fee rounding.
    #[serde(default = "default_cash_margin")]
    pub cash_margin: Decimal,
}

/// One session window as "HH:MM" strings.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Opening time, local.
    pub open: String,
    /// Closing time, local.
    pub close: String,
}

/// Trading schedule configuration (weekdays only).
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Session windows, typically main session plus evening session.
    pub sessions: Vec<SessionConfig>,
}

impl ScheduleConfig {
    /// Parse the configured windows into a validated schedule.
    pub fn to_schedule(&self) -> Result<SessionSchedule> {
        let mut windows = Vec::with_capacity(self.sessions.len());
        for session in &self.sessions {
            let open = NaiveTime::parse_from_str(&session.open, "%H:%M")
                .with_context(|| format!("invalid session open time {:?}", session.open))?;
            let close = NaiveTime::parse_from_str(&session.close, "%H:%M")
                .with_context(|| format!("invalid session close time {:?}", session.close))?;
            windows.push(SessionWindow { open, close });
        }
        SessionSchedule::new(windows)
    }
}

/// Loop cadence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CadenceConfig {
    /// Pause between cycles while the session is open.
    #[serde(default = "default_poll_seconds")]
    pub poll_seconds: u64,
    /// Pause between schedule re-checks while the session is closed.
    #[serde(default = "default_closed_backoff_seconds")]
    pub closed_backoff_seconds: u64,
    /// Pause after an accepted order before re-querying dependent state.
    #[serde(default = "default_settle_delay_seconds")]
    pub settle_delay_seconds: u64,
}

impl CadenceConfig {
    /// Convert to the trading loop's interval set.
    pub fn intervals(&self) -> LoopIntervals {
        LoopIntervals {
            poll: Duration::from_secs(self.poll_seconds),
            closed_backoff: Duration::from_secs(self.closed_backoff_seconds),
            settle_delay: Duration::from_secs(self.settle_delay_seconds),
        }
    }
}

/// Retry budget configuration, applied uniformly to every port call.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total attempts before a call is abandoned.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed backoff between attempts, in seconds.
    #[serde(default = "default_retry_backoff_seconds")]
    pub backoff_seconds: u64,
}

impl RetryConfig {
    /// Convert to the resilient-call wrapper's policy.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: Duration::from_secs(self.backoff_seconds),
        }
    }
}

// Default value functions for serde

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_cash_margin() -> Decimal {
    crate::domain::engine::DEFAULT_CASH_MARGIN
}

fn default_poll_seconds() -> u64 {
    30
}

fn default_closed_backoff_seconds() -> u64 {
    300
}

fn default_settle_delay_seconds() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    100
}

fn default_retry_backoff_seconds() -> u64 {
    10
}
