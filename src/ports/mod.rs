//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the brokerage. Adapters implement these traits.
//!
//! Port categories:
//! - `InstrumentCatalog`: ticker/id resolution, built once at startup
//! - `MarketData`: last traded prices
//! - `PortfolioSource`: cash and position snapshots
//! - `OrderGateway`: best-price order submission

pub mod catalog;
pub mod market_data;
pub mod orders;
pub mod portfolio;

/// Failure taxonomy shared by every port call.
///
/// Callers branch on the variant explicitly: `Transport` and `Unavailable`
/// are transient and retried by the resilient-call wrapper, `NotFound` is a
/// configuration problem, and `Rejected` carries a brokerage order refusal.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Network or API failure; retryable.
    #[error("transport failure: {0}")]
    Transport(#[source] anyhow::Error),
    /// The brokerage has no data for the request right now; retryable.
    #[error("no data available: {0}")]
    Unavailable(String),
    /// Unknown ticker or instrument id.
    #[error("instrument not found: {0}")]
    NotFound(String),
    /// The brokerage refused the order.
    #[error("order rejected: {0}")]
    Rejected(String),
}
