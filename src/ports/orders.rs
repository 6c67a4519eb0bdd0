//! Order Port - Best-Price Order Submission Interface
//!
//! Defines the trait for submitting best-price orders and confirming
//! acceptance. Every order carries a client-generated idempotency id so a
//! retried submission cannot double-execute.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::instrument::{AccountId, InstrumentId};

use super::PortError;

/// Order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// A best-price order ready for submission.
///
/// Created immediately before the port call and discarded after
/// confirmation or exhausted retries. The idempotency id is generated once
/// per logical submission and reused across that submission's retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Client-generated idempotency id.
    pub order_id: String,
    /// Instrument to trade.
    pub instrument_id: InstrumentId,
    /// Quantity in whole lots.
    pub lots: u64,
    /// Buy or sell.
    pub side: OrderSide,
}

impl OrderRequest {
    /// Create a new order with a fresh idempotency id.
    pub fn new(instrument_id: InstrumentId, lots: u64, side: OrderSide) -> Self {
        Self {
            order_id: Uuid::new_v4().to_string(),
            instrument_id,
            lots,
            side,
        }
    }
}

/// Confirmation of an accepted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// The idempotency id the order was submitted under.
    pub order_id: String,
    /// Brokerage-side status string (e.g. "FILL", "NEW").
    pub status: String,
}

/// Trait for order submission providers.
#[async_trait]
pub trait OrderGateway: Send + Sync + 'static {
    /// Submit a best-price order and confirm acceptance.
    ///
    /// # Errors
    /// `PortError::Rejected` when the brokerage refuses the order,
    /// `PortError::Transport` on network/API failure.
    async fn submit(
        &self,
        account_id: &AccountId,
        order: &OrderRequest,
    ) -> Result<OrderReceipt, PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_request_gets_unique_ids() {
        let a = OrderRequest::new("ord-1".to_string(), 5, OrderSide::Buy);
        let b = OrderRequest::new("ord-1".to_string(), 5, OrderSide::Buy);
        assert_ne!(a.order_id, b.order_id);
    }

    #[test]
    fn test_order_side_display() {
        assert_eq!(format!("{}", OrderSide::Buy), "BUY");
        assert_eq!(format!("{}", OrderSide::Sell), "SELL");
    }
}
