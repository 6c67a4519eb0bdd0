//! Spread engine — the rebalancing decision function.
//!
//! Pure and deterministic: given the current spread quote, the pair's
//! holdings, available cash, and lot sizes, computes the target rebalancing
//! action. No I/O, no hidden state; identical inputs always yield identical
//! actions.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::instrument::PairLeg;
use super::portfolio::PairHoldings;
use super::spread::{BandPosition, SpreadQuote, ThresholdBand};

/// Default cash margin reserved against slippage and fee rounding
/// between quote time and fill time.
pub const DEFAULT_CASH_MARGIN: Decimal = Decimal::from_parts(98, 0, 0, false, 2);

/// The action the trading loop should execute this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebalanceAction {
    /// Spread inside the neutral band, already positioned, or nothing
    /// affordable: hold the current position unchanged.
    Hold,
    /// Nothing economically held on the source leg: enter the target leg
    /// with the lots affordable from current cash.
    BuyOnly {
        /// Leg to buy into.
        target: PairLeg,
        /// Whole lots to buy, sized from cash at decision time.
        lots: u64,
    },
    /// Exit the source leg, then enter the target leg.
    ///
    /// The buy leg carries no quantity: it is sized by the loop only after
    /// the sell is confirmed and cash has been re-queried.
    SellThenBuy {
        /// Leg to sell out of.
        sell_leg: PairLeg,
        /// Whole lots to sell (`floor(held / lot)`).
        sell_lots: u64,
        /// Leg to buy into afterwards.
        buy_target: PairLeg,
    },
}

/// Whole lots affordable with `cash` at `price`, keeping the margin back.
///
/// `floor(cash / price / lot × margin)` — truncated, never rounded up, so
/// the committed amount can never exceed available cash. Returns 0 for
/// non-positive price, zero lot, or non-positive cash.
pub fn affordable_lots(cash: Decimal, price: Decimal, lot: u32, margin: Decimal) -> u64 {
    if price <= Decimal::ZERO || lot == 0 || cash <= Decimal::ZERO {
        return 0;
    }
    (cash / price / Decimal::from(lot) * margin)
        .floor()
        .to_u64()
        .unwrap_or(0)
}

/// Whole lots a holding of `quantity` raw units can sell.
///
/// Truncates: a remainder below one lot is never rounded up into an
/// over-sell. The stranded residue is the caller's to report.
pub fn sell_lots(quantity: u64, lot: u32) -> u64 {
    if lot == 0 {
        return 0;
    }
    quantity / u64::from(lot)
}

/// The spread-driven rebalancing decision engine.
#[derive(Debug, Clone, Copy)]
pub struct SpreadEngine {
    /// Neutral band thresholds.
    band: ThresholdBand,
    /// Fraction of cash committed on buys (e.g. 0.98).
    cash_margin: Decimal,
}

impl SpreadEngine {
    /// Create an engine over the given band and cash margin factor.
    pub fn new(band: ThresholdBand, cash_margin: Decimal) -> Self {
        Self { band, cash_margin }
    }

    /// The configured cash margin factor.
    pub fn cash_margin(&self) -> Decimal {
        self.cash_margin
    }

    /// Decide the rebalancing action for one cycle.
    ///
    /// Policy:
    /// - spread below the band: target fully-ordinary;
    /// - spread above the band: target fully-preferred;
    /// - inside the band (bounds inclusive): hold.
    pub fn decide(
        &self,
        quote: &SpreadQuote,
        holdings: &PairHoldings,
        cash: Decimal,
        ordinary_lot: u32,
        preferred_lot: u32,
    ) -> RebalanceAction {
        match self.band.classify(quote.spread) {
            BandPosition::Inside => RebalanceAction::Hold,
            BandPosition::BelowLower => self.rebalance_toward(
                PairLeg::Ordinary,
                quote,
                holdings,
                cash,
                ordinary_lot,
                preferred_lot,
            ),
            BandPosition::AboveUpper => self.rebalance_toward(
                PairLeg::Preferred,
                quote,
                holdings,
                cash,
                preferred_lot,
                ordinary_lot,
            ),
        }
    }

    /// Move the account fully into `target`, selling the opposite leg first
    /// when it is the one economically held.
    fn rebalance_toward(
        &self,
        target: PairLeg,
        quote: &SpreadQuote,
        holdings: &PairHoldings,
        cash: Decimal,
        target_lot: u32,
        source_lot: u32,
    ) -> RebalanceAction {
        let source = target.other();
        match holdings.held_leg(quote) {
            Some(leg) if leg == target => RebalanceAction::Hold,
            Some(_) => {
                let lots = sell_lots(holdings.on(source), source_lot);
                if lots == 0 {
                    // Residue below one lot cannot be sold; fall through to
                    // a cash-only entry on the target leg.
                    self.buy_only(target, quote, cash, target_lot)
                } else {
                    RebalanceAction::SellThenBuy {
                        sell_leg: source,
                        sell_lots: lots,
                        buy_target: target,
                    }
                }
            }
            None => self.buy_only(target, quote, cash, target_lot),
        }
    }

    /// Cash-only entry into `target`; degrades to `Hold` when nothing
    /// is affordable.
    fn buy_only(
        &self,
        target: PairLeg,
        quote: &SpreadQuote,
        cash: Decimal,
        target_lot: u32,
    ) -> RebalanceAction {
        let price = match target {
            PairLeg::Ordinary => quote.ordinary_price,
            PairLeg::Preferred => quote.preferred_price,
        };
        let lots = affordable_lots(cash, price, target_lot, self.cash_margin);
        if lots == 0 {
            RebalanceAction::Hold
        } else {
            RebalanceAction::BuyOnly { target, lots }
        }
    }
}
