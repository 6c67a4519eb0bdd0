//! Instrument Catalog Port - Reference Data Resolution
//!
//! Flat lookup from ticker or instrument id to the immutable
//! `InstrumentRef` record. Built once during startup and read-only
//! afterwards, so resolution is synchronous.

use crate::domain::instrument::{InstrumentId, InstrumentRef};

/// Trait for instrument reference-data providers.
pub trait InstrumentCatalog: Send + Sync + 'static {
    /// Resolve an exchange ticker to its instrument record.
    fn resolve_ticker(&self, ticker: &str) -> Option<InstrumentRef>;

    /// Resolve a brokerage instrument id back to the same record.
    fn resolve_id(&self, id: &InstrumentId) -> Option<InstrumentRef>;
}
