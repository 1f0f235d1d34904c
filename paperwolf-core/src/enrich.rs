//! History enrichment — best-effort sparkline data for display.
//!
//! Enrichment failures must never fail a decision or a tick: a provider
//! error is logged and the decision proceeds with an empty history.

use thiserror::Error;
use tracing::warn;

use crate::domain::{CandlePoint, Decision};

/// Number of recent points kept per decision.
pub const HISTORY_POINTS: usize = 60;

/// Errors a history provider may surface.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no history available for '{0}'")]
    Missing(String),
    #[error("history source error: {0}")]
    Source(String),
}

/// Source of recent close/volume series, queried per ticker.
///
/// Series retrieval is an external concern; implementations live at the
/// application edge (file-backed, cached, networked).
pub trait HistoryProvider {
    /// Recent points in chronological order (oldest first).
    fn recent_history(&self, ticker: &str) -> Result<Vec<CandlePoint>, HistoryError>;
}

/// Attach recent history to each decision, keeping the most recent
/// `HISTORY_POINTS` points. Failures degrade to an empty history.
pub fn enrich_decisions(decisions: &mut [Decision], provider: &dyn HistoryProvider) {
    for decision in decisions.iter_mut() {
        match provider.recent_history(&decision.ticker) {
            Ok(mut points) => {
                if points.len() > HISTORY_POINTS {
                    points.drain(..points.len() - HISTORY_POINTS);
                }
                decision.history = points;
            }
            Err(err) => {
                warn!(ticker = %decision.ticker, %err, "history enrichment failed");
                decision.history = Vec::new();
            }
        }
    }
}
