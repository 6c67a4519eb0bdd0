//! Market Data Adapter - Last-Price Queries
//!
//! Implements the `MarketData` port over the brokerage's last-prices
//! endpoint. One attempt per call; the trading loop retries.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::instrument::InstrumentId;
use crate::ports::PortError;
use crate::ports::market_data::MarketData;

use super::client::BrokerClient;
use super::types::LastPricesResponse;

/// Last-price adapter over the brokerage HTTP client.
pub struct BrokerMarketData {
    client: Arc<BrokerClient>,
}

impl BrokerMarketData {
    /// Create a new market data adapter.
    pub fn new(client: Arc<BrokerClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MarketData for BrokerMarketData {
    async fn last_price(&self, instrument_id: &InstrumentId) -> Result<Decimal, PortError> {
        let path = format!("/market-data/last-prices?instrument_id={instrument_id}");
        let response = self.client.get(&path).await?;
        let parsed: LastPricesResponse = response
            .json()
            .await
            .map_err(|e| PortError::Transport(e.into()))?;

        let price = parsed
            .last_prices
            .iter()
            .find(|p| &p.instrument_id == instrument_id)
            .and_then(|p| p.price)
            .ok_or_else(|| PortError::Unavailable(format!("no last price for {instrument_id}")))?;

        let price = price.to_decimal();
        debug!(instrument_id = %instrument_id, price = %price, "last price fetched");
        Ok(price)
    }
}
