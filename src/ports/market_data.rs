//! Market Data Port - Last Traded Price Interface
//!
//! Defines the trait for fetching the most recent traded price of an
//! instrument. The trading loop polls this port once per leg per cycle;
//! there is no streaming surface.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::instrument::InstrumentId;

use super::PortError;

/// Trait for last-price providers.
#[async_trait]
pub trait MarketData: Send + Sync + 'static {
    /// The most recent traded price of the instrument, in major
    /// currency units.
    ///
    /// # Errors
    /// `PortError::Unavailable` when no quote exists for the instrument,
    /// `PortError::Transport` on network/API failure.
    async fn last_price(&self, instrument_id: &InstrumentId) -> Result<Decimal, PortError>;
}
