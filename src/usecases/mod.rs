//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the bot's core workflows.
//!
//! Use cases:
//! - `TradingLoop`: polling cycle, session gating, sell-then-buy sequencing
//! - `retry`: uniform resilient-call wrapper for every port invocation

pub mod retry;
pub mod trading_loop;
