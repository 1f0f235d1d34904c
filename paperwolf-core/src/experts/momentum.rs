//! Momentum "sniper" expert — intraday VWAP + RSI + volume z-score vote.

use serde::{Deserialize, Serialize};

use super::SignalSource;
use crate::domain::{SignalClass, Vote};

/// Precomputed intraday features for one ticker (latest candle).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumSnapshot {
    pub ticker: String,
    pub close: f64,
    pub vwap: f64,
    pub rsi: f64,
    pub volume_z: f64,
}

/// Score the snapshot and emit a momentum vote.
///
/// Bullish checklist, one point each:
/// - close above VWAP (institutional support)
/// - RSI in the 55..75 band (momentum without exhaustion); an oversold
///   RSI (< 30) scores half a point as a possible reversal
/// - volume z-score above 1.0 (participation spike)
///
/// Three points is high conviction (0.85), two is moderate (0.60),
/// anything less is a neutral "wait for setup".
pub fn classify_momentum(snapshot: &MomentumSnapshot) -> Vote {
    let mut score = 0.0;
    let mut reasons: Vec<String> = Vec::new();

    if snapshot.close > snapshot.vwap {
        score += 1.0;
        reasons.push("Price > VWAP".to_string());
    }

    if snapshot.rsi > 55.0 && snapshot.rsi < 75.0 {
        score += 1.0;
        reasons.push(format!("RSI bullish ({:.1})", snapshot.rsi));
    } else if snapshot.rsi < 30.0 {
        score += 0.5;
        reasons.push(format!("RSI oversold ({:.1})", snapshot.rsi));
    }

    if snapshot.volume_z > 1.0 {
        score += 1.0;
        // The "Volume" token is load-bearing: fusion derives the
        // volume_confirmed flag from it.
        reasons.push(format!("Volume Spike (Z={:.1})", snapshot.volume_z));
    }

    let (signal, confidence, reason) = if score >= 3.0 {
        (SignalClass::Buy, 0.85, reasons.join(" + "))
    } else if score >= 2.0 {
        (SignalClass::Buy, 0.60, reasons.join(" + "))
    } else {
        (SignalClass::Neutral, 0.0, "Wait for setup".to_string())
    };

    Vote {
        ticker: snapshot.ticker.clone(),
        signal,
        confidence,
        reason,
    }
}

/// `SignalSource` over a batch of momentum snapshots.
pub struct MomentumSource {
    snapshots: Vec<MomentumSnapshot>,
}

impl MomentumSource {
    pub fn new(snapshots: Vec<MomentumSnapshot>) -> Self {
        Self { snapshots }
    }
}

impl SignalSource for MomentumSource {
    fn name(&self) -> &str {
        "momentum-sniper"
    }

    fn scan(&self) -> Vec<Vote> {
        self.snapshots.iter().map(classify_momentum).collect()
    }
}
