//! Instrument reference data types.
//!
//! Defines the immutable instrument records produced by catalog resolution
//! and the ordinary/preferred pair the strategy trades. These types are the
//! foundation of the hexagonal architecture's inner ring.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────
// Type aliases consumed by ports and adapters
// ────────────────────────────────────────────

/// Opaque brokerage instrument identifier used at the ports boundary.
pub type InstrumentId = String;

/// Brokerage account identifier used at the ports boundary.
pub type AccountId = String;

/// Immutable instrument record resolved from the catalog at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRef {
    /// Opaque unique instrument id assigned by the brokerage.
    pub id: InstrumentId,
    /// Exchange ticker (e.g. "SBER").
    pub ticker: String,
    /// Human-readable display name.
    pub name: String,
    /// Lot size in raw units (>= 1).
    pub lot: u32,
}

/// Which leg of the ordinary/preferred pair a quantity or order refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairLeg {
    /// The ordinary (common) share.
    Ordinary,
    /// The preferred share.
    Preferred,
}

impl PairLeg {
    /// The opposite leg of the pair.
    pub fn other(self) -> Self {
        match self {
            Self::Ordinary => Self::Preferred,
            Self::Preferred => Self::Ordinary,
        }
    }
}

impl std::fmt::Display for PairLeg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ordinary => write!(f, "ordinary"),
            Self::Preferred => write!(f, "preferred"),
        }
    }
}

/// A resolved ordinary/preferred instrument pair.
///
/// Built once during startup from two catalog lookups and treated as
/// read-only for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairInstruments {
    /// The ordinary share leg.
    pub ordinary: InstrumentRef,
    /// The preferred share leg.
    pub preferred: InstrumentRef,
}

impl PairInstruments {
    /// The instrument backing the given leg.
    pub fn leg(&self, leg: PairLeg) -> &InstrumentRef {
        match leg {
            PairLeg::Ordinary => &self.ordinary,
            PairLeg::Preferred => &self.preferred,
        }
    }
}
