//! Portfolio Port - Account State Interface
//!
//! Defines the trait for capturing a fresh cash/positions snapshot.
//! Snapshots are immutable once returned; dependent calculations after a
//! mutating order must re-query rather than reuse one.

use async_trait::async_trait;

use crate::domain::instrument::AccountId;
use crate::domain::portfolio::PortfolioSnapshot;

use super::PortError;

/// Trait for portfolio snapshot providers.
#[async_trait]
pub trait PortfolioSource: Send + Sync + 'static {
    /// Capture a point-in-time snapshot of the account's cash and
    /// positions.
    ///
    /// # Errors
    /// `PortError::Transport` on network/API failure,
    /// `PortError::Unavailable` when the account state cannot be served.
    async fn snapshot(&self, account_id: &AccountId) -> Result<PortfolioSnapshot, PortError>;
}
