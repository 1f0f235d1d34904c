//! CandlePoint — one point of the sparkline history attached to a decision.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single close/volume observation, used only for display enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlePoint {
    pub time: NaiveDateTime,
    pub close: f64,
    pub volume: u64,
}
