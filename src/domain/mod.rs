//! Domain layer - Core business logic and models.
//!
//! Pure inner ring of the hexagonal architecture: instrument records,
//! portfolio snapshots, the spread quote and threshold band, the
//! rebalancing decision engine, and the session schedule. No I/O here;
//! everything is testable in isolation.

pub mod engine;
pub mod instrument;
pub mod portfolio;
pub mod schedule;
pub mod spread;

// Re-export core types for convenience
pub use engine::{DEFAULT_CASH_MARGIN, RebalanceAction, SpreadEngine};
pub use instrument::{AccountId, InstrumentId, InstrumentRef, PairInstruments, PairLeg};
pub use portfolio::{PairHoldings, PortfolioSnapshot, Position};
pub use schedule::{SessionSchedule, SessionWindow};
pub use spread::{BandPosition, SpreadQuote, ThresholdBand};
