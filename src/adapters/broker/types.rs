//! Brokerage API Request/Response Types
//!
//! Serialization types for the brokerage REST API. Monetary values travel
//! as `units + nano` pairs (nano = 1e-9 fractions) and are converted to
//! `Decimal` at this boundary so nothing downstream touches the wire
//! representation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary value as integer units plus nanoseconds-style fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyValue {
    /// Whole currency units.
    pub units: i64,
    /// Fractional part in 1e-9 units, same sign as `units`.
    pub nano: i32,
}

impl MoneyValue {
    /// Exact decimal amount in major currency units.
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.units) + Decimal::new(i64::from(self.nano), 9)
    }

    /// Amount truncated to the smallest currency unit (scale 2).
    pub fn to_minor_units(self) -> i64 {
        self.units * 100 + i64::from(self.nano) / 10_000_000
    }
}

/// One brokerage account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountDto {
    /// Account identifier.
    pub id: String,
    /// Display name, if the brokerage assigns one.
    #[serde(default)]
    pub name: Option<String>,
}

/// Response from GET /accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsResponse {
    pub accounts: Vec<AccountDto>,
}

/// One share instrument from the reference-data listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareDto {
    /// Opaque unique instrument id.
    pub id: String,
    /// Exchange ticker.
    pub ticker: String,
    /// Display name.
    pub name: String,
    /// Lot size in raw units.
    pub lot: u32,
}

/// Response from GET /instruments/shares.
#[derive(Debug, Clone, Deserialize)]
pub struct SharesResponse {
    pub instruments: Vec<ShareDto>,
}

/// One last-price entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LastPriceDto {
    /// Instrument the price is for.
    pub instrument_id: String,
    /// Last traded price; absent when the instrument has not traded.
    pub price: Option<MoneyValue>,
}

/// Response from GET /market-data/last-prices.
#[derive(Debug, Clone, Deserialize)]
pub struct LastPricesResponse {
    pub last_prices: Vec<LastPriceDto>,
}

/// One cash balance entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MoneyAmount {
    /// ISO currency code.
    pub currency: String,
    /// Balance as units + nano, flattened on the wire.
    #[serde(flatten)]
    pub value: MoneyValue,
}

/// One held security entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityDto {
    /// Instrument held.
    pub instrument_id: String,
    /// Balance in raw units.
    pub balance: i64,
}

/// Response from GET /operations/positions.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsResponse {
    /// Cash balances per currency.
    pub money: Vec<MoneyAmount>,
    /// Held securities.
    pub securities: Vec<SecurityDto>,
}

/// Order submission payload for POST /orders.
#[derive(Debug, Clone, Serialize)]
pub struct PostOrderRequest {
    /// Client-generated idempotency id.
    pub order_id: String,
    /// Account to trade on.
    pub account_id: String,
    /// Instrument to trade.
    pub instrument_id: String,
    /// Quantity in whole lots.
    pub quantity: u64,
    /// "BUY" or "SELL".
    pub direction: String,
    /// Always "BESTPRICE": execute at the best available price.
    pub order_type: String,
}

/// Response from order submission.
#[derive(Debug, Clone, Deserialize)]
pub struct PostOrderResponse {
    /// Brokerage-assigned order id.
    pub order_id: String,
    /// Execution status, e.g. "FILL", "NEW", "REJECTED".
    pub execution_status: String,
    /// Rejection detail when refused.
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_value_to_decimal() {
        let money = MoneyValue {
            units: 250,
            nano: 500_000_000,
        };
        assert_eq!(money.to_decimal(), dec!(250.5));
    }

    #[test]
    fn test_money_value_negative() {
        let money = MoneyValue {
            units: -2,
            nano: -250_000_000,
        };
        assert_eq!(money.to_decimal(), dec!(-2.25));
    }

    #[test]
    fn test_money_value_to_minor_units_truncates() {
        let money = MoneyValue {
            units: 10,
            nano: 999_999_999,
        };
        // 10.999999999 → 1099 minor units, fraction below a cent dropped
        assert_eq!(money.to_minor_units(), 1099);
    }

    #[test]
    fn test_last_prices_payload_with_missing_price() {
        let payload = r#"{
            "last_prices": [
                { "instrument_id": "a", "price": { "units": 250, "nano": 120000000 } },
                { "instrument_id": "b" }
            ]
        }"#;
        let parsed: LastPricesResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.last_prices[0].price.unwrap().to_decimal(), dec!(250.12));
        assert!(parsed.last_prices[1].price.is_none());
    }

    #[test]
    fn test_post_order_request_wire_shape() {
        let request = PostOrderRequest {
            order_id: "id-1".to_string(),
            account_id: "acc-1".to_string(),
            instrument_id: "share-1".to_string(),
            quantity: 5,
            direction: "SELL".to_string(),
            order_type: "BESTPRICE".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["direction"], "SELL");
        assert_eq!(value["order_type"], "BESTPRICE");
        assert_eq!(value["quantity"], 5);
    }

    #[test]
    fn test_positions_payload_money_stays_flat_on_the_wire() {
        let payload = r#"{
            "money": [ { "currency": "RUB", "units": 1234, "nano": 560000000 } ],
            "securities": [ { "instrument_id": "a", "balance": 50 } ]
        }"#;
        let parsed: PositionsResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.money[0].currency, "RUB");
        assert_eq!(parsed.money[0].value.to_minor_units(), 123_456);
    }

    #[test]
    fn test_rejection_payload_parses_without_message() {
        let payload = r#"{ "order_id": "b-1", "execution_status": "REJECTED" }"#;
        let parsed: PostOrderResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.execution_status, "REJECTED");
        assert!(parsed.message.is_none());
    }
}
