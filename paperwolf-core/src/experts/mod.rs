//! Expert vote sources — black boxes to the fusion and simulation layers.
//!
//! Indicator computation (RSI, VWAP, volume z-score, HV rank) happens
//! upstream; the classifiers here turn precomputed feature snapshots into
//! votes. The fusion engine only ever sees `Vote` batches through the
//! `SignalSource` seam.

mod momentum;
mod volatility;

pub use momentum::{classify_momentum, MomentumSnapshot, MomentumSource};
pub use volatility::{classify_regime, RegimeSource, VolatilitySnapshot};

use crate::domain::Vote;

/// A batch source of expert votes.
///
/// # Invariants
/// - `scan()` MUST be deterministic for the same underlying snapshots
/// - `scan()` MUST NOT depend on portfolio state
pub trait SignalSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Produce one vote per ticker this source has an opinion on.
    fn scan(&self) -> Vec<Vote>;
}
