//! Vote — one expert's opinion on a single ticker.

use serde::{Deserialize, Serialize};

/// Classification emitted by an expert for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalClass {
    /// Bullish momentum detected.
    Buy,
    /// No edge.
    Neutral,
    /// High-volatility regime: sell premium.
    Income,
    /// Low-volatility regime: coiled, expect expansion.
    SniperPrep,
}

/// One expert's opinion: signal class, confidence, and a rationale string.
///
/// Confidence is nominally in [0, 1] but the upper bound is not enforced;
/// downstream fusion may push it above 1.0 (see the sniper boost).
/// Votes are ephemeral — produced per scan, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub ticker: String,
    pub signal: SignalClass,
    pub confidence: f64,
    pub reason: String,
}

impl Vote {
    /// Default vote substituted when an expert has no opinion on a ticker.
    pub fn neutral(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            signal: SignalClass::Neutral,
            confidence: 0.0,
            reason: "N/A".to_string(),
        }
    }

    /// Whether the rationale names a volume-confirmed setup.
    ///
    /// Case-sensitive by contract: expert reasons spell the token "Volume".
    pub fn mentions_volume(&self) -> bool {
        self.reason.contains("Volume")
    }
}
