//! Brokerage REST API Adapter
//!
//! Implements the four port traits over the brokerage's REST API.
//! The client performs exactly one attempt per call: retry discipline
//! lives in the trading loop's resilient wrapper so every port fails
//! with identical semantics.
//!
//! Sub-modules:
//! - `client`: authenticated HTTP client and error classification
//! - `catalog`: flat instrument lookup built once at startup
//! - `market_data`: last-price queries
//! - `portfolio`: cash/position snapshots
//! - `orders`: best-price order submission
//! - `types`: API request/response type definitions

pub mod catalog;
pub mod client;
pub mod market_data;
pub mod orders;
pub mod portfolio;
pub mod types;
