//! Volatility "income" expert — regime vote from the historical-volatility rank.
//!
//! HV rank is the percentile of current realized volatility over the past
//! year (0–100), computed upstream. A high rank means rich premium that
//! tends to mean-revert; a low rank means a coiled market waiting to expand.

use serde::{Deserialize, Serialize};

use super::SignalSource;
use crate::domain::{SignalClass, Vote};

/// Precomputed volatility features for one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilitySnapshot {
    pub ticker: String,
    /// Percentile rank of current HV over the trailing year, in [0, 100].
    pub hv_rank: f64,
}

/// Classify the volatility regime and emit a vote.
///
/// - rank > 80: INCOME (sell premium), confidence scales with the rank
/// - rank < 20: SNIPER_PREP (expect compression breakout), flat 0.70
/// - otherwise: NEUTRAL
pub fn classify_regime(snapshot: &VolatilitySnapshot) -> Vote {
    let rank = snapshot.hv_rank;

    let (signal, confidence, reason) = if rank > 80.0 {
        (
            SignalClass::Income,
            0.8 + (rank - 80.0) / 100.0,
            format!("High volatility (rank {rank:.0}%) -> sell premium"),
        )
    } else if rank < 20.0 {
        (
            SignalClass::SniperPrep,
            0.70,
            format!("Low volatility (rank {rank:.0}%) -> expect compression breakout"),
        )
    } else {
        (
            SignalClass::Neutral,
            0.0,
            format!("Normal volatility (rank {rank:.0}%)"),
        )
    };

    Vote {
        ticker: snapshot.ticker.clone(),
        signal,
        confidence,
        reason,
    }
}

/// `SignalSource` over a batch of volatility snapshots.
pub struct RegimeSource {
    snapshots: Vec<VolatilitySnapshot>,
}

impl RegimeSource {
    pub fn new(snapshots: Vec<VolatilitySnapshot>) -> Self {
        Self { snapshots }
    }
}

impl SignalSource for RegimeSource {
    fn name(&self) -> &str {
        "volatility-income"
    }

    fn scan(&self) -> Vec<Vote> {
        self.snapshots.iter().map(classify_regime).collect()
    }
}
