//! Paperwolf Core — domain types, expert classifiers, decision fusion, enrichment.
//!
//! This crate contains the stateless half of the system:
//! - Domain types (votes, decisions, candle points)
//! - The two expert vote classifiers (momentum sniper, volatility regime)
//! - The regime rule table that fuses two expert votes into one decision
//! - Best-effort history enrichment for display
//!
//! Everything here is a pure function of its inputs; the stateful
//! simulation lives in `paperwolf-sim`.

pub mod domain;
pub mod enrich;
pub mod experts;
pub mod fusion;

pub use domain::{CandlePoint, Decision, SignalClass, TradeAction, Vote};
pub use enrich::{enrich_decisions, HistoryError, HistoryProvider};
pub use experts::{
    classify_momentum, classify_regime, MomentumSnapshot, MomentumSource, RegimeSource,
    SignalSource, VolatilitySnapshot,
};
pub use fusion::{fuse, fuse_batch, rank_by_confidence};
