//! Portfolio snapshot types.
//!
//! A snapshot is captured once per cycle from the portfolio port and is
//! immutable afterwards: dependent calculations always work from a fresh
//! snapshot, never from one carried over a mutating order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::instrument::{InstrumentId, PairInstruments, PairLeg};
use super::spread::SpreadQuote;

/// A single held position, in raw units (not lots).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Instrument this position is in.
    pub instrument_id: InstrumentId,
    /// Held quantity in raw units.
    pub quantity: u64,
}

/// Point-in-time view of the account: cash plus all positions.
///
/// Replaced wholesale on every portfolio query; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Cash available, in the smallest currency unit (scale 2).
    pub cash_minor: i64,
    /// All positions at snapshot time.
    pub positions: Vec<Position>,
    /// When the snapshot was captured.
    pub taken_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    /// Cash as an exact decimal amount in major currency units,
    /// matching the unit quoted prices are expressed in.
    pub fn cash(&self) -> Decimal {
        Decimal::new(self.cash_minor, 2)
    }

    /// Held quantity of the given instrument, zero if absent.
    pub fn quantity_of(&self, instrument_id: &str) -> u64 {
        self.positions
            .iter()
            .find(|p| p.instrument_id == instrument_id)
            .map_or(0, |p| p.quantity)
    }
}

/// The pair's two held quantities extracted from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairHoldings {
    /// Ordinary shares held, raw units.
    pub ordinary: u64,
    /// Preferred shares held, raw units.
    pub preferred: u64,
}

impl PairHoldings {
    /// Extract the pair's holdings from a portfolio snapshot.
    pub fn of_pair(snapshot: &PortfolioSnapshot, pair: &PairInstruments) -> Self {
        Self {
            ordinary: snapshot.quantity_of(&pair.ordinary.id),
            preferred: snapshot.quantity_of(&pair.preferred.id),
        }
    }

    /// Held quantity on the given leg.
    pub fn on(&self, leg: PairLeg) -> u64 {
        match leg {
            PairLeg::Ordinary => self.ordinary,
            PairLeg::Preferred => self.preferred,
        }
    }

    /// Which leg the account is considered positioned in.
    ///
    /// Under the strategy's own actions at most one leg is ever held, but a
    /// partial fill can leave residue on both. In that case the economically
    /// larger leg (quantity × current price) counts as held; an exact tie
    /// resolves to the ordinary leg.
    pub fn held_leg(&self, quote: &SpreadQuote) -> Option<PairLeg> {
        match (self.ordinary, self.preferred) {
            (0, 0) => None,
            (_, 0) => Some(PairLeg::Ordinary),
            (0, _) => Some(PairLeg::Preferred),
            (ord, pref) => {
                let ord_exposure = Decimal::from(ord) * quote.ordinary_price;
                let pref_exposure = Decimal::from(pref) * quote.preferred_price;
                if pref_exposure > ord_exposure {
                    Some(PairLeg::Preferred)
                } else {
                    Some(PairLeg::Ordinary)
                }
            }
        }
    }
}
