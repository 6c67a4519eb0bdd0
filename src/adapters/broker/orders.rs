//! Order Adapter - Best-Price Order Submission
//!
//! Implements the `OrderGateway` port over the brokerage's order
//! endpoint. Every order goes out as BESTPRICE; a brokerage-side refusal
//! surfaces as `PortError::Rejected`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::instrument::AccountId;
use crate::ports::PortError;
use crate::ports::orders::{OrderGateway, OrderReceipt, OrderRequest};

use super::client::BrokerClient;
use super::types::{PostOrderRequest, PostOrderResponse};

/// Order submission adapter over the brokerage HTTP client.
pub struct BrokerOrders {
    client: Arc<BrokerClient>,
}

impl BrokerOrders {
    /// Create a new order adapter.
    pub fn new(client: Arc<BrokerClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderGateway for BrokerOrders {
    async fn submit(
        &self,
        account_id: &AccountId,
        order: &OrderRequest,
    ) -> Result<OrderReceipt, PortError> {
        let payload = PostOrderRequest {
            order_id: order.order_id.clone(),
            account_id: account_id.clone(),
            instrument_id: order.instrument_id.clone(),
            quantity: order.lots,
            direction: order.side.to_string(),
            order_type: "BESTPRICE".to_string(),
        };

        let response = self.client.post("/orders", &payload).await?;
        let parsed: PostOrderResponse = response
            .json()
            .await
            .map_err(|e| PortError::Transport(e.into()))?;

        if parsed.execution_status == "REJECTED" {
            return Err(PortError::Rejected(
                parsed.message.unwrap_or_else(|| "order rejected".to_string()),
            ));
        }

        debug!(
            order_id = %order.order_id,
            broker_order_id = %parsed.order_id,
            status = %parsed.execution_status,
            "order submitted"
        );

        Ok(OrderReceipt {
            order_id: order.order_id.clone(),
            status: parsed.execution_status,
        })
    }
}
