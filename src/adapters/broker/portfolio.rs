//! Portfolio Adapter - Cash/Position Snapshots
//!
//! Implements the `PortfolioSource` port over the brokerage's positions
//! endpoint. Each call produces a brand-new immutable snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::domain::instrument::AccountId;
use crate::domain::portfolio::{PortfolioSnapshot, Position};
use crate::ports::PortError;
use crate::ports::portfolio::PortfolioSource;

use super::client::BrokerClient;
use super::types::PositionsResponse;

/// Portfolio snapshot adapter over the brokerage HTTP client.
pub struct BrokerPortfolio {
    client: Arc<BrokerClient>,
}

impl BrokerPortfolio {
    /// Create a new portfolio adapter.
    pub fn new(client: Arc<BrokerClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PortfolioSource for BrokerPortfolio {
    async fn snapshot(&self, account_id: &AccountId) -> Result<PortfolioSnapshot, PortError> {
        let path = format!("/operations/positions?account_id={account_id}");
        let response = self.client.get(&path).await?;
        let parsed: PositionsResponse = response
            .json()
            .await
            .map_err(|e| PortError::Transport(e.into()))?;

        // The account trades a single currency; its balance is the first
        // (and only) money entry.
        let cash_minor = parsed
            .money
            .first()
            .map(|m| m.value.to_minor_units())
            .ok_or_else(|| {
                PortError::Unavailable(format!("no cash balance for account {account_id}"))
            })?;

        let positions = parsed
            .securities
            .into_iter()
            .filter(|s| s.balance > 0)
            .map(|s| Position {
                instrument_id: s.instrument_id,
                quantity: s.balance.unsigned_abs(),
            })
            .collect::<Vec<_>>();

        debug!(
            account = %account_id,
            cash_minor,
            positions = positions.len(),
            "portfolio snapshot captured"
        );

        Ok(PortfolioSnapshot {
            cash_minor,
            positions,
            taken_at: Utc::now(),
        })
    }
}
