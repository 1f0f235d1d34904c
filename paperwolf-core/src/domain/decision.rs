//! Decision — the fused, final recommendation for a ticker.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::candle::CandlePoint;

/// Strategy shape selected by the fusion rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    /// No edge detected.
    Wait,
    /// Normal regime, bullish momentum: buy the stock.
    LongStock,
    /// Low-vol coil plus momentum trigger: buy calls.
    LongCallSniper,
    /// Low-vol coil without a trigger yet: stalk it.
    WatchForBreakout,
    /// High-vol regime, no directional bias: sell neutral premium.
    IronCondor,
    /// High-vol regime with bullish momentum: defined-risk credit spread.
    BullPutSpread,
}

impl TradeAction {
    /// Whether the action opens long-delta exposure the simulator can hold.
    ///
    /// This replaces the original's substring probing of action text
    /// ("BUY"/"LONG"/"SNIPER"), which would have misclassified names like
    /// WATCH_FOR_BREAKOUT had they contained those tokens.
    pub fn is_long_delta(&self) -> bool {
        matches!(self, Self::LongStock | Self::LongCallSniper)
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wait => "WAIT",
            Self::LongStock => "LONG_STOCK",
            Self::LongCallSniper => "LONG_CALL_SNIPER",
            Self::WatchForBreakout => "WATCH_FOR_BREAKOUT",
            Self::IronCondor => "IRON_CONDOR",
            Self::BullPutSpread => "BULL_PUT_SPREAD",
        };
        f.write_str(name)
    }
}

/// The fused recommendation for one ticker, consumed exactly once per tick.
///
/// `is_buy_signal` and `volume_confirmed` are computed by the fusion step;
/// the simulation engine reads the flags and never inspects prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub ticker: String,
    pub action: TradeAction,
    pub confidence: f64,
    /// Ordered rationale trail (regime line first, then the resolution).
    pub rationale: Vec<String>,
    /// Last observed close; 0.0 when no quote is available.
    pub price: f64,
    /// Recent sparkline history; empty when enrichment failed or was skipped.
    pub history: Vec<CandlePoint>,
    /// True when the action opens long-delta exposure.
    pub is_buy_signal: bool,
    /// True when either expert's rationale named a volume-confirmed setup.
    pub volume_confirmed: bool,
}
