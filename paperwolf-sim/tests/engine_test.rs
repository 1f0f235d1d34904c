//! Integration tests for the tick state machine: entries, exits, scoring.

use paperwolf_core::{Decision, TradeAction};
use paperwolf_sim::{
    Level, MemoryStore, PortfolioState, SimConfig, SimulationEngine, StateStore, StoreError,
};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn decision(
    ticker: &str,
    action: TradeAction,
    confidence: f64,
    price: f64,
    volume_confirmed: bool,
) -> Decision {
    Decision {
        ticker: ticker.into(),
        action,
        confidence,
        rationale: vec!["test".into()],
        price,
        history: Vec::new(),
        is_buy_signal: action.is_long_delta(),
        volume_confirmed,
    }
}

fn buy(ticker: &str, confidence: f64, price: f64) -> Decision {
    decision(ticker, TradeAction::LongStock, confidence, price, false)
}

fn fresh_engine() -> SimulationEngine<MemoryStore> {
    SimulationEngine::new(MemoryStore::new(), SimConfig::default())
}

/// Store whose saves fail once a budget of successes runs out.
struct FailingStore {
    seeded: Option<PortfolioState>,
    successes_left: usize,
}

impl FailingStore {
    fn new() -> Self {
        Self {
            seeded: None,
            successes_left: 0,
        }
    }

    /// First save succeeds, every later one fails.
    fn after_one(seeded: PortfolioState) -> Self {
        Self {
            seeded: Some(seeded),
            successes_left: 1,
        }
    }
}

impl StateStore for FailingStore {
    fn load(&self) -> Option<PortfolioState> {
        self.seeded.clone()
    }

    fn save(&mut self, _state: &PortfolioState) -> Result<(), StoreError> {
        if self.successes_left > 0 {
            self.successes_left -= 1;
            return Ok(());
        }
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }
}

// ──────────────────────────────────────────────
// Entries
// ──────────────────────────────────────────────

#[test]
fn novice_entry_with_volume_boost() {
    // Novice threshold 0.10; conf 0.20 + 0.10 volume boost = 0.30.
    // Allocation 20% of 10_000 = 2_000 at price 100 -> 20 shares.
    let mut engine = fresh_engine();
    let logs = engine
        .process_tick(&[decision("TCS.NS", TradeAction::LongStock, 0.20, 100.0, true)])
        .unwrap();

    let state = engine.portfolio();
    let position = &state.positions["TCS.NS"];
    assert_eq!(position.quantity, 20);
    assert_eq!(position.avg_price, 100.0);
    assert_eq!(state.cash, 8_000.0);
    // Phase C: 8_000 + 20 * 100.
    assert_eq!(state.balance, 10_000.0);

    assert_eq!(logs.len(), 1);
    assert!(logs[0].contains("BOUGHT TCS.NS"));
    assert!(logs[0].contains("0.30"));
    assert!(logs[0].contains("Novice"));
    // History is newest-first and mirrors the tick log.
    assert_eq!(state.history.front().unwrap(), &logs[0]);
}

#[test]
fn zero_price_skips_entry() {
    let mut engine = fresh_engine();
    let logs = engine.process_tick(&[buy("NOQUOTE", 0.99, 0.0)]).unwrap();
    assert!(logs.is_empty());
    assert!(engine.portfolio().positions.is_empty());
}

#[test]
fn non_buy_actions_never_enter() {
    let mut engine = fresh_engine();
    let batch = [
        decision("CONDOR", TradeAction::IronCondor, 0.95, 100.0, false),
        decision("SPREAD", TradeAction::BullPutSpread, 0.95, 100.0, false),
        decision("WATCH", TradeAction::WatchForBreakout, 0.95, 100.0, false),
        decision("WAIT", TradeAction::Wait, 0.95, 100.0, false),
    ];
    engine.process_tick(&batch).unwrap();
    assert!(engine.portfolio().positions.is_empty());
}

#[test]
fn threshold_rises_with_level() {
    // Apprentice (score 50) requires 0.40.
    let mut seeded = paperwolf_sim::PortfolioState::default();
    seeded.score = 50;
    seeded.level = Level::for_score(seeded.score);
    let mut engine = SimulationEngine::new(MemoryStore::seeded(seeded), SimConfig::default());

    engine.process_tick(&[buy("LOWCONF", 0.30, 100.0)]).unwrap();
    assert!(engine.portfolio().positions.is_empty());

    engine.process_tick(&[buy("OKCONF", 0.45, 100.0)]).unwrap();
    assert!(engine.portfolio().has_position("OKCONF"));
}

#[test]
fn held_ticker_is_not_repurchased() {
    let mut engine = fresh_engine();
    engine.process_tick(&[buy("TCS.NS", 0.50, 100.0)]).unwrap();
    let qty_before = engine.portfolio().positions["TCS.NS"].quantity;

    // Price moved but stayed inside the TP/SL band; no exit, no re-entry.
    engine.process_tick(&[buy("TCS.NS", 0.90, 100.5)]).unwrap();
    let state = engine.portfolio();
    assert_eq!(state.positions["TCS.NS"].quantity, qty_before);
    assert_eq!(state.positions["TCS.NS"].avg_price, 100.0);
}

#[test]
fn entry_requires_cash_above_allocation() {
    // Tie up cash across four entries; the fifth allocation exceeds cash.
    let mut engine = fresh_engine();
    let batch: Vec<Decision> = ["A", "B", "C", "D", "E"]
        .iter()
        .map(|t| buy(t, 0.50, 100.0))
        .collect();
    engine.process_tick(&batch).unwrap();

    let state = engine.portfolio();
    // A..D: each debits 2_000 (balance stays 10_000 until Phase C).
    // Before E: cash 2_000, allocation 2_000 -> strict > fails.
    assert_eq!(state.positions.len(), 4);
    assert!(!state.has_position("E"));
    assert_eq!(state.cash, 2_000.0);
    assert_eq!(state.balance, 10_000.0);
}

#[test]
fn price_above_allocation_yields_zero_quantity() {
    // Allocation 2_000, price 2_500 -> floor(0.8) = 0 shares, no entry.
    let mut engine = fresh_engine();
    engine.process_tick(&[buy("PRICEY", 0.50, 2_500.0)]).unwrap();
    assert!(engine.portfolio().positions.is_empty());
    assert_eq!(engine.portfolio().cash, 10_000.0);
}

#[test]
fn entries_never_change_score() {
    let mut engine = fresh_engine();
    engine.process_tick(&[buy("TCS.NS", 0.50, 100.0)]).unwrap();
    assert_eq!(engine.portfolio().score, 0);
    assert_eq!(engine.portfolio().level, Level::Novice);
}

// ──────────────────────────────────────────────
// Exits
// ──────────────────────────────────────────────

#[test]
fn take_profit_at_one_percent() {
    let mut engine = fresh_engine();
    engine.process_tick(&[buy("TCS.NS", 0.50, 100.0)]).unwrap();

    // 100 -> 101 is exactly +1.0%: TP triggers, reward +1.
    let logs = engine.process_tick(&[buy("TCS.NS", 0.0, 101.0)]).unwrap();

    let state = engine.portfolio();
    assert!(!state.has_position("TCS.NS"));
    assert_eq!(state.cash, 8_000.0 + 20.0 * 101.0);
    assert_eq!(state.balance, 10_020.0);
    assert_eq!(state.score, 1);
    assert!(logs[0].starts_with("SELL_TP TCS.NS"));
    assert!(logs[0].contains("+1 pts"));
}

#[test]
fn stop_loss_below_half_percent() {
    let mut engine = fresh_engine();
    engine.process_tick(&[buy("TCS.NS", 0.50, 100.0)]).unwrap();

    // 100 -> 99.4 is -0.6%: SL triggers, reward -4.
    let logs = engine.process_tick(&[buy("TCS.NS", 0.0, 99.4)]).unwrap();

    let state = engine.portfolio();
    assert!(!state.has_position("TCS.NS"));
    assert_eq!(state.score, -4);
    // Score can go negative; level recomputes to Novice.
    assert_eq!(state.level, Level::Novice);
    assert!(logs[0].starts_with("SELL_SL TCS.NS"));
    assert!(logs[0].contains("-4 pts"));
}

#[test]
fn no_exit_inside_band() {
    let mut engine = fresh_engine();
    engine.process_tick(&[buy("TCS.NS", 0.50, 100.0)]).unwrap();
    engine.process_tick(&[buy("TCS.NS", 0.0, 100.5)]).unwrap();
    assert!(engine.portfolio().has_position("TCS.NS"));
}

#[test]
fn stale_position_left_untouched() {
    let mut engine = fresh_engine();
    engine.process_tick(&[buy("TCS.NS", 0.50, 100.0)]).unwrap();

    // Batch without the held ticker: no exit, avg_price valuation.
    engine.process_tick(&[buy("OTHER", 0.05, 50.0)]).unwrap();
    let state = engine.portfolio();
    assert!(state.has_position("TCS.NS"));
    assert_eq!(state.balance, state.cash + 20.0 * 100.0);
}

#[test]
fn zero_price_never_liquidates_a_holding() {
    let mut engine = fresh_engine();
    engine.process_tick(&[buy("TCS.NS", 0.50, 100.0)]).unwrap();

    // A quoteless batch entry for a held ticker is ignored for exits too.
    engine.process_tick(&[buy("TCS.NS", 0.0, 0.0)]).unwrap();
    let state = engine.portfolio();
    assert!(state.has_position("TCS.NS"));
    assert_eq!(state.balance, state.cash + 20.0 * 100.0);
}

#[test]
fn exit_then_reentry_in_later_tick() {
    let mut engine = fresh_engine();
    engine.process_tick(&[buy("TCS.NS", 0.50, 100.0)]).unwrap();
    engine.process_tick(&[buy("TCS.NS", 0.0, 101.0)]).unwrap();
    assert!(!engine.portfolio().has_position("TCS.NS"));

    // Exit and entry happen in separate phases of separate ticks here;
    // within one tick, an exited ticker may be re-entered by Phase B.
    let logs = engine.process_tick(&[buy("TCS.NS", 0.50, 101.0)]).unwrap();
    assert!(engine.portfolio().has_position("TCS.NS"));
    assert_eq!(logs.len(), 1);
}

// ──────────────────────────────────────────────
// Persistence failures
// ──────────────────────────────────────────────

#[test]
fn failed_persist_aborts_the_tick_but_keeps_trades_in_memory() {
    let mut engine = SimulationEngine::new(FailingStore::new(), SimConfig::default());
    let result = engine.process_tick(&[buy("TCS.NS", 0.50, 100.0)]);
    assert!(result.is_err());

    // Exits, entries, and the mark-to-market ran before the write;
    // only the survival phase is cut off by the error.
    let state = engine.portfolio();
    assert!(state.has_position("TCS.NS"));
    assert_eq!(state.cash, 8_000.0);
    assert_eq!(state.balance, 10_000.0);
}

#[test]
fn failed_survival_persist_still_applies_the_margin_call() {
    let mut broke = PortfolioState::default();
    broke.balance = -100.0;
    broke.cash = -100.0;
    broke.score = 120;
    broke.level = Level::Pro;

    // Mark-to-market save succeeds, the survival-phase save does not.
    let mut engine = SimulationEngine::new(FailingStore::after_one(broke), SimConfig::default());
    let result = engine.process_tick(&[]);
    assert!(result.is_err());

    let state = engine.portfolio();
    assert_eq!(state.level, Level::Apprentice);
    assert_eq!(state.balance, 10_000.0);
    assert_eq!(state.cash, 10_000.0);
    assert_eq!(state.score, 70);
}

// ──────────────────────────────────────────────
// Leveling
// ──────────────────────────────────────────────

#[test]
fn level_up_on_score_threshold() {
    let mut seeded = paperwolf_sim::PortfolioState::default();
    seeded.score = 49;
    let mut engine = SimulationEngine::new(MemoryStore::seeded(seeded), SimConfig::default());

    engine.process_tick(&[buy("TCS.NS", 0.50, 100.0)]).unwrap();
    engine.process_tick(&[buy("TCS.NS", 0.0, 101.0)]).unwrap();

    let state = engine.portfolio();
    assert_eq!(state.score, 50);
    assert_eq!(state.level, Level::Apprentice);
}

#[test]
fn score_drop_demotes_through_same_table() {
    let mut seeded = paperwolf_sim::PortfolioState::default();
    seeded.score = 52;
    seeded.level = Level::Apprentice;
    let mut engine = SimulationEngine::new(MemoryStore::seeded(seeded), SimConfig::default());

    // Apprentice threshold 0.40.
    engine.process_tick(&[buy("TCS.NS", 0.50, 100.0)]).unwrap();
    engine.process_tick(&[buy("TCS.NS", 0.0, 99.0)]).unwrap();

    let state = engine.portfolio();
    assert_eq!(state.score, 48);
    assert_eq!(state.level, Level::Novice);
}

// ──────────────────────────────────────────────
// History
// ──────────────────────────────────────────────

#[test]
fn history_is_newest_first() {
    let mut engine = fresh_engine();
    engine.process_tick(&[buy("AAA", 0.50, 100.0)]).unwrap();
    engine.process_tick(&[buy("BBB", 0.50, 50.0)]).unwrap();

    let history = &engine.portfolio().history;
    assert!(history[0].contains("BBB"));
    assert!(history[1].contains("AAA"));
}

#[test]
fn history_limit_bounds_the_log() {
    let config = SimConfig {
        history_limit: Some(3),
        ..SimConfig::default()
    };
    let mut engine = SimulationEngine::new(MemoryStore::new(), config);
    for (i, ticker) in ["A", "B", "C", "D", "E"].iter().enumerate() {
        engine
            .process_tick(&[buy(ticker, 0.50, 10.0 + i as f64)])
            .unwrap();
    }
    let history = &engine.portfolio().history;
    assert_eq!(history.len(), 3);
    assert!(history[0].contains("E"));
}
