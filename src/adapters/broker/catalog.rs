//! Catalog Adapter - Flat Instrument Lookup
//!
//! Fetches the full share listing once at startup and indexes it by
//! ticker and by instrument id. Read-only afterwards, so lookups are
//! synchronous map hits.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::instrument::{InstrumentId, InstrumentRef};
use crate::ports::catalog::InstrumentCatalog;

use super::client::BrokerClient;
use super::types::SharesResponse;

/// In-memory instrument catalog built from the brokerage share listing.
pub struct BrokerCatalog {
    by_ticker: HashMap<String, InstrumentRef>,
    by_id: HashMap<InstrumentId, InstrumentRef>,
}

impl BrokerCatalog {
    /// Fetch the share listing and build both indexes.
    ///
    /// A failure here is a fatal startup error: the strategy cannot run
    /// without reference data.
    pub async fn load(client: &BrokerClient) -> Result<Self> {
        let response = client
            .get("/instruments/shares")
            .await
            .context("Failed to fetch share listing")?;
        let listing: SharesResponse = response
            .json()
            .await
            .context("Failed to parse share listing")?;

        let mut by_ticker = HashMap::with_capacity(listing.instruments.len());
        let mut by_id = HashMap::with_capacity(listing.instruments.len());
        for share in listing.instruments {
            let instrument = InstrumentRef {
                id: share.id,
                ticker: share.ticker,
                name: share.name,
                lot: share.lot.max(1),
            };
            by_ticker.insert(instrument.ticker.clone(), instrument.clone());
            by_id.insert(instrument.id.clone(), instrument);
        }

        info!(instruments = by_id.len(), "Instrument catalog loaded");
        Ok(Self { by_ticker, by_id })
    }

    /// Build a catalog from pre-resolved records (tests, dry runs).
    pub fn from_instruments(instruments: Vec<InstrumentRef>) -> Self {
        let mut by_ticker = HashMap::new();
        let mut by_id = HashMap::new();
        for instrument in instruments {
            by_ticker.insert(instrument.ticker.clone(), instrument.clone());
            by_id.insert(instrument.id.clone(), instrument);
        }
        Self { by_ticker, by_id }
    }
}

impl InstrumentCatalog for BrokerCatalog {
    fn resolve_ticker(&self, ticker: &str) -> Option<InstrumentRef> {
        self.by_ticker.get(ticker).cloned()
    }

    fn resolve_id(&self, id: &InstrumentId) -> Option<InstrumentRef> {
        self.by_id.get(id).cloned()
    }
}
