//! Scan orchestration — one full signal-to-simulation pass.
//!
//! Mirrors the request surface an API layer would expose: query both
//! experts, fuse the votes, enrich for display, run exactly one tick,
//! and return the ranked decisions plus the portfolio snapshot and the
//! tick's log lines.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use paperwolf_core::{
    enrich_decisions, fuse_batch, rank_by_confidence, Decision, HistoryProvider, SignalSource,
};

use crate::engine::SimulationEngine;
use crate::portfolio::PortfolioState;
use crate::store::{StateStore, StoreError};

/// Result of one scan pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Fused decisions, ranked by descending confidence.
    pub decisions: Vec<Decision>,
    /// Portfolio snapshot after the tick.
    pub portfolio: PortfolioState,
    /// Log lines generated by the tick.
    pub logs: Vec<String>,
}

/// Run one scan: experts -> fusion -> enrichment -> one tick -> report.
///
/// The expert queries are independent of each other and of portfolio
/// state; fusion and the tick are strictly sequential. Enrichment is
/// best-effort and cannot fail the scan. Only a persistence write failure
/// propagates as an error.
pub fn run_scan<S: StateStore>(
    engine: &mut SimulationEngine<S>,
    income_source: &dyn SignalSource,
    sniper_source: &dyn SignalSource,
    prices: &HashMap<String, f64>,
    history_provider: Option<&dyn HistoryProvider>,
) -> Result<ScanReport, StoreError> {
    let income_votes = income_source.scan();
    let sniper_votes = sniper_source.scan();

    let mut decisions = fuse_batch(&income_votes, &sniper_votes, prices);
    if let Some(provider) = history_provider {
        enrich_decisions(&mut decisions, provider);
    }

    let logs = engine.process_tick(&decisions)?;
    rank_by_confidence(&mut decisions);

    Ok(ScanReport {
        decisions,
        portfolio: engine.portfolio().clone(),
        logs,
    })
}
