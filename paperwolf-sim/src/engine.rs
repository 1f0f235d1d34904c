//! Simulation engine — the tick state machine over the portfolio.
//!
//! A tick is processed in four ordered phases, each seeing the state left
//! by the previous one:
//!
//! 1. **Exits** — take-profit / stop-loss on held tickers with a usable
//!    batch price; score and level update on every close.
//! 2. **Entries** — level-gated confidence threshold, 20%-of-balance
//!    allocation, at most one position per ticker.
//! 3. **Mark-to-market** — recompute the balance identity and persist.
//! 4. **Survival** — perma-death for Novice, margin-call demotion for
//!    higher tiers; persist again.
//!
//! Single writer assumed; there is no internal locking.

use std::collections::BTreeMap;

use tracing::{debug, info};

use paperwolf_core::Decision;

use crate::config::SimConfig;
use crate::portfolio::{AccountStatus, Level, PortfolioState, Position};
use crate::store::{StateStore, StoreError};

/// Reward added to the score on a take-profit close.
const REWARD_TAKE_PROFIT: i64 = 1;
/// Penalty on a stop-loss close. Losses hurt four times as much.
const REWARD_STOP_LOSS: i64 = -4;
/// Score penalty applied by a margin call.
const MARGIN_CALL_PENALTY: i64 = 50;

/// The stateful paper-trading engine.
///
/// Owns the portfolio, a persistence store, and the game-rule config.
/// All mutation happens through `process_tick` and `reset`.
pub struct SimulationEngine<S: StateStore> {
    state: PortfolioState,
    store: S,
    config: SimConfig,
}

impl<S: StateStore> SimulationEngine<S> {
    /// Load state from the store, falling back to a fresh portfolio when
    /// the document is absent or unreadable.
    pub fn new(store: S, config: SimConfig) -> Self {
        let state = store
            .load()
            .unwrap_or_else(|| PortfolioState::with_balance(config.initial_balance));
        Self {
            state,
            store,
            config,
        }
    }

    /// Current portfolio snapshot.
    pub fn portfolio(&self) -> &PortfolioState {
        &self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    /// Reinitialize every field to the canonical default and persist.
    /// This is the only DEAD -> ALIVE transition.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.state = PortfolioState::with_balance(self.config.initial_balance);
        self.store.save(&self.state)?;
        info!("portfolio reset to defaults");
        Ok(())
    }

    /// Process one tick of fused decisions. Returns the log lines the tick
    /// generated; also mutates and persists the portfolio.
    ///
    /// A DEAD portfolio is frozen: the tick is a no-op until an explicit
    /// `reset`.
    pub fn process_tick(&mut self, decisions: &[Decision]) -> Result<Vec<String>, StoreError> {
        if self.state.status == AccountStatus::Dead {
            debug!("tick ignored: portfolio is DEAD");
            return Ok(Vec::new());
        }

        // Usable marks: batch prices > 0. A zero price means "no quote";
        // the position is neither exited nor re-marked this tick.
        let marks: BTreeMap<String, f64> = decisions
            .iter()
            .filter(|d| d.price > 0.0)
            .map(|d| (d.ticker.clone(), d.price))
            .collect();

        let mut logs = Vec::new();

        self.evaluate_exits(&marks, &mut logs);
        self.evaluate_entries(decisions, &mut logs);

        // Phase 3: mark-to-market and persist.
        self.state.balance = self.state.equity(&marks);
        self.store.save(&self.state)?;

        self.check_survival(&mut logs)?;

        Ok(logs)
    }

    /// Phase 1: close held positions that hit take-profit or stop-loss.
    /// Held tickers without a usable batch price are left untouched.
    fn evaluate_exits(&mut self, marks: &BTreeMap<String, f64>, logs: &mut Vec<String>) {
        let held: Vec<String> = self.state.positions.keys().cloned().collect();
        for ticker in held {
            let Some(&price) = marks.get(&ticker) else {
                continue;
            };
            let Some(position) = self.state.positions.get(&ticker) else {
                continue;
            };
            let pnl_pct = position.pnl_pct(price);

            let close = if pnl_pct >= self.config.take_profit_pct {
                Some(("SELL_TP", REWARD_TAKE_PROFIT))
            } else if pnl_pct <= self.config.stop_loss_pct {
                Some(("SELL_SL", REWARD_STOP_LOSS))
            } else {
                None
            };

            if let Some((label, reward)) = close {
                if let Some(position) = self.state.positions.remove(&ticker) {
                    self.state.cash += position.market_value(price);
                    self.state.score += reward;
                    self.state.level = Level::for_score(self.state.score);

                    let line = format!(
                        "{label} {ticker} @ {price:.2}. PnL: {pnl_pct:.2}%. Reward: {reward:+} pts"
                    );
                    info!(%ticker, price, pnl_pct, reward, "position closed");
                    self.push_history(&line);
                    logs.push(line);
                }
            }
        }
    }

    /// Phase 2: open positions for qualifying decisions. Entries never
    /// change score or level.
    fn evaluate_entries(&mut self, decisions: &[Decision], logs: &mut Vec<String>) {
        for decision in decisions {
            if self.state.has_position(&decision.ticker) {
                continue;
            }
            if decision.price <= 0.0 {
                continue;
            }

            let threshold = self.state.level.entry_threshold();
            let mut adjusted = decision.confidence;
            if decision.volume_confirmed {
                adjusted += self.config.volume_boost;
            }

            if adjusted < threshold || !decision.is_buy_signal {
                continue;
            }

            let allocation = self.state.balance * self.config.allocation_fraction;
            if self.state.cash <= allocation {
                debug!(ticker = %decision.ticker, "entry skipped: insufficient cash");
                continue;
            }
            let quantity = (allocation / decision.price).floor() as u64;
            if quantity == 0 {
                continue;
            }

            self.state.cash -= quantity as f64 * decision.price;
            self.state.positions.insert(
                decision.ticker.clone(),
                Position {
                    quantity,
                    avg_price: decision.price,
                },
            );

            let line = format!(
                "BOUGHT {} @ {:.2}. Conf: {:.2} (Risk: {})",
                decision.ticker, decision.price, adjusted, self.state.level
            );
            info!(ticker = %decision.ticker, price = decision.price, quantity, "position opened");
            self.push_history(&line);
            logs.push(line);
        }
    }

    /// Phase 4: the perma-death mechanic. Runs after every tick.
    ///
    /// Bankrupt as Novice: the account dies and stays dead until an
    /// external reset (balance, cash, and positions are left as-is).
    /// Bankrupt at any higher tier: margin call — capital is refilled at
    /// the cost of one tier and 50 score points.
    fn check_survival(&mut self, logs: &mut Vec<String>) -> Result<(), StoreError> {
        if self.state.balance <= 0.0 {
            if self.state.level == Level::Novice {
                self.state.status = AccountStatus::Dead;
                self.state.score = 0;
                let line = "ACCOUNT BLOWN! Game over. Reset required".to_string();
                info!("portfolio dead: novice bankruptcy");
                self.push_history(&line);
                logs.push(line);
            } else {
                self.state.balance = self.config.initial_balance;
                self.state.cash = self.config.initial_balance;
                self.state.level = self.state.level.demoted();
                self.state.score = (self.state.score - MARGIN_CALL_PENALTY).max(0);
                let line = format!(
                    "MARGIN CALL! Level lost. Balance reset (now {})",
                    self.state.level
                );
                info!(level = %self.state.level, "margin call demotion");
                self.push_history(&line);
                logs.push(line);
            }
        }
        // Idempotent when nothing changed.
        self.store.save(&self.state)
    }

    /// Prepend a history line, trimming to the configured cap.
    fn push_history(&mut self, line: &str) {
        self.state.history.push_front(line.to_string());
        if let Some(limit) = self.config.history_limit {
            self.state.history.truncate(limit);
        }
    }
}
