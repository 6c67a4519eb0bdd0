//! Property-Based Tests - Domain Layer Invariants
//!
//! Uses `proptest` to verify that the spread engine and its sizing
//! helpers maintain their invariants across random inputs.

use proptest::prelude::*;
use rust_decimal::Decimal;

use pairspread_bot::domain::engine::{
    DEFAULT_CASH_MARGIN, RebalanceAction, SpreadEngine, affordable_lots, sell_lots,
};
use pairspread_bot::domain::portfolio::PairHoldings;
use pairspread_bot::domain::spread::{BandPosition, SpreadQuote, ThresholdBand};

/// A price in [0.01, 100000.00] with two decimal places.
fn price() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|n| Decimal::new(n, 2))
}

/// A cash balance in [0.00, 10000000.00] with two decimal places.
fn cash() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000).prop_map(|n| Decimal::new(n, 2))
}

// ── Threshold Band Properties ───────────────────────────────

proptest! {
    /// Every spread falls in exactly one band region, and the bounds
    /// themselves classify as inside.
    #[test]
    fn band_classification_is_total_and_inclusive(
        lower in -10_000i64..0,
        width in 1i64..20_000,
        spread in -30_000i64..30_000,
    ) {
        let lower = Decimal::new(lower, 2);
        let upper = lower + Decimal::new(width, 2);
        let band = ThresholdBand::new(lower, upper).unwrap();

        let spread = Decimal::new(spread, 2);
        let position = band.classify(spread);
        match position {
            BandPosition::BelowLower => prop_assert!(spread < band.lower()),
            BandPosition::Inside => {
                prop_assert!(spread >= band.lower() && spread <= band.upper());
            }
            BandPosition::AboveUpper => prop_assert!(spread > band.upper()),
        }
        prop_assert_eq!(band.classify(band.lower()), BandPosition::Inside);
        prop_assert_eq!(band.classify(band.upper()), BandPosition::Inside);
    }

    /// The spread is always the rounded ordinary-minus-preferred
    /// difference, to exactly two decimal places.
    #[test]
    fn spread_is_rounded_difference(ordinary in price(), preferred in price()) {
        let quote = SpreadQuote::new(ordinary, preferred);
        prop_assert_eq!(quote.spread, (ordinary - preferred).round_dp(2));
        prop_assert!(quote.spread.scale() <= 2);
    }
}

// ── Sizing Properties ───────────────────────────────────────

proptest! {
    /// The committed amount of a sized buy can never exceed cash.
    #[test]
    fn affordable_lots_never_overcommits(
        cash in cash(),
        price in price(),
        lot in 1u32..1000,
    ) {
        let lots = affordable_lots(cash, price, lot, DEFAULT_CASH_MARGIN);
        let committed = Decimal::from(lots) * Decimal::from(lot) * price;
        prop_assert!(
            committed <= cash,
            "committed {committed} exceeds cash {cash}"
        );
    }

    /// Sold lots never exceed the raw units held.
    #[test]
    fn sell_lots_never_oversells(quantity in 0u64..1_000_000, lot in 1u32..1000) {
        let lots = sell_lots(quantity, lot);
        prop_assert!(lots * u64::from(lot) <= quantity);
    }
}

// ── Engine Properties ───────────────────────────────────────

proptest! {
    /// The engine is a pure function: identical inputs always yield
    /// identical actions.
    #[test]
    fn decide_is_deterministic(
        ordinary_price in price(),
        preferred_price in price(),
        cash in cash(),
        ordinary_held in 0u64..10_000,
        preferred_held in 0u64..10_000,
    ) {
        let band = ThresholdBand::new(Decimal::new(-100, 2), Decimal::new(100, 2)).unwrap();
        let engine = SpreadEngine::new(band, DEFAULT_CASH_MARGIN);
        let quote = SpreadQuote::new(ordinary_price, preferred_price);
        let holdings = PairHoldings {
            ordinary: ordinary_held,
            preferred: preferred_held,
        };

        let first = engine.decide(&quote, &holdings, cash, 1, 10);
        let second = engine.decide(&quote, &holdings, cash, 1, 10);
        prop_assert_eq!(first, second);
    }

    /// A sell decision always moves whole lots and targets the opposite leg.
    #[test]
    fn sell_decisions_are_whole_lot_and_cross_leg(
        ordinary_price in price(),
        preferred_price in price(),
        cash in cash(),
        ordinary_held in 0u64..10_000,
        preferred_held in 0u64..10_000,
        lot in 1u32..100,
    ) {
        let band = ThresholdBand::new(Decimal::new(-100, 2), Decimal::new(100, 2)).unwrap();
        let engine = SpreadEngine::new(band, DEFAULT_CASH_MARGIN);
        let quote = SpreadQuote::new(ordinary_price, preferred_price);
        let holdings = PairHoldings {
            ordinary: ordinary_held,
            preferred: preferred_held,
        };

        if let RebalanceAction::SellThenBuy { sell_leg, sell_lots: lots, buy_target } =
            engine.decide(&quote, &holdings, cash, lot, lot)
        {
            prop_assert!(lots > 0);
            prop_assert!(lots * u64::from(lot) <= holdings.on(sell_leg));
            prop_assert_eq!(buy_target, sell_leg.other());
        }
    }

    /// Inside the band the engine never trades, whatever the account holds.
    #[test]
    fn inside_band_always_holds(
        preferred_price in price(),
        offset in -100i64..=100,
        cash in cash(),
        ordinary_held in 0u64..10_000,
        preferred_held in 0u64..10_000,
    ) {
        let band = ThresholdBand::new(Decimal::new(-100, 2), Decimal::new(100, 2)).unwrap();
        let engine = SpreadEngine::new(band, DEFAULT_CASH_MARGIN);
        // Force the spread inside the band by construction.
        let ordinary_price = preferred_price + Decimal::new(offset, 2);
        let quote = SpreadQuote::new(ordinary_price, preferred_price);
        let holdings = PairHoldings {
            ordinary: ordinary_held,
            preferred: preferred_held,
        };

        let action = engine.decide(&quote, &holdings, cash, 1, 10);
        prop_assert_eq!(action, RebalanceAction::Hold);
    }
}
