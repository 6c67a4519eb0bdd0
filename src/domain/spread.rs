//! Spread quote and threshold band.
//!
//! The spread is the price gap between the ordinary and preferred legs,
//! recomputed on every poll. The threshold band splits the spread axis into
//! the three regions the decision policy acts on.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Most recent traded prices of both legs and their spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadQuote {
    /// Last traded price of the ordinary share.
    pub ordinary_price: Decimal,
    /// Last traded price of the preferred share.
    pub preferred_price: Decimal,
    /// ordinary − preferred, rounded to 2 decimal places.
    pub spread: Decimal,
}

impl SpreadQuote {
    /// Build a quote from the two last prices.
    pub fn new(ordinary_price: Decimal, preferred_price: Decimal) -> Self {
        Self {
            ordinary_price,
            preferred_price,
            spread: (ordinary_price - preferred_price).round_dp(2),
        }
    }
}

/// Where a spread value sits relative to the threshold band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandPosition {
    /// spread < lower bound: target fully-ordinary.
    BelowLower,
    /// lower ≤ spread ≤ upper: neutral, hold current position.
    Inside,
    /// spread > upper bound: target fully-preferred.
    AboveUpper,
}

/// Operator-supplied spread thresholds, immutable for the run.
///
/// Invariant: `lower < upper`, enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdBand {
    lower: Decimal,
    upper: Decimal,
}

impl ThresholdBand {
    /// Create a band, rejecting `lower >= upper`.
    pub fn new(lower: Decimal, upper: Decimal) -> anyhow::Result<Self> {
        anyhow::ensure!(
            lower < upper,
            "threshold lower bound {lower} must be below upper bound {upper}"
        );
        Ok(Self { lower, upper })
    }

    /// Lower bound of the neutral band.
    pub fn lower(&self) -> Decimal {
        self.lower
    }

    /// Upper bound of the neutral band.
    pub fn upper(&self) -> Decimal {
        self.upper
    }

    /// Classify a spread. Both bounds belong to the neutral band.
    pub fn classify(&self, spread: Decimal) -> BandPosition {
        if spread < self.lower {
            BandPosition::BelowLower
        } else if spread > self.upper {
            BandPosition::AboveUpper
        } else {
            BandPosition::Inside
        }
    }
}
