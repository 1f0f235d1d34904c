//! Portfolio — the single long-lived aggregate the simulation mutates.
//!
//! Accounting identity, checked after every mark-to-market phase:
//! `balance == cash + sum(qty * mark price)` where the mark falls back to
//! the entry price for tickers absent from the current batch.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical starting capital.
pub const DEFAULT_BALANCE: f64 = 10_000.0;

/// Gamified skill rank, a pure function of cumulative score.
///
/// Ordering note: Wolf outranks Grandmaster on the score ladder (500 vs
/// 200) even though Grandmaster sounds grander. The entry-threshold table
/// treats Grandmaster as the fallback tier (0.85).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Level {
    #[default]
    Novice,
    Apprentice,
    Pro,
    Grandmaster,
    Wolf,
}

impl Level {
    /// Level for a cumulative score. Highest threshold wins; recomputing
    /// after a score drop demotes through this same table.
    pub fn for_score(score: i64) -> Self {
        if score >= 500 {
            Self::Wolf
        } else if score >= 200 {
            Self::Grandmaster
        } else if score >= 100 {
            Self::Pro
        } else if score >= 50 {
            Self::Apprentice
        } else {
            Self::Novice
        }
    }

    /// Minimum adjusted confidence required to open a position at this tier.
    pub fn entry_threshold(&self) -> f64 {
        match self {
            Self::Novice => 0.10,
            Self::Apprentice => 0.40,
            Self::Pro => 0.70,
            Self::Wolf => 0.90,
            // Fallback tier: disciplined but not Wolf-strict.
            Self::Grandmaster => 0.85,
        }
    }

    /// One-tier demotion applied by a margin call.
    pub fn demoted(&self) -> Self {
        match self {
            Self::Wolf | Self::Grandmaster => Self::Pro,
            Self::Pro => Self::Apprentice,
            Self::Apprentice | Self::Novice => Self::Novice,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Novice => "Novice",
            Self::Apprentice => "Apprentice",
            Self::Pro => "Pro",
            Self::Grandmaster => "Grandmaster",
            Self::Wolf => "Wolf",
        };
        f.write_str(name)
    }
}

/// Whether the account is still playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    #[default]
    Alive,
    Dead,
}

/// An open position. Quantity and entry price are both positive by
/// construction: entries require price > 0 and qty > 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "qty")]
    pub quantity: u64,
    pub avg_price: f64,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    /// Percent gain/loss at the given mark.
    pub fn pnl_pct(&self, price: f64) -> f64 {
        (price - self.avg_price) / self.avg_price * 100.0
    }
}

/// The persisted portfolio document.
///
/// Positions live in a `BTreeMap` so exit evaluation and the serialized
/// form are deterministic. History is newest-first and unbounded unless
/// the engine config caps it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioState {
    pub balance: f64,
    pub cash: f64,
    pub positions: BTreeMap<String, Position>,
    pub history: VecDeque<String>,
    pub score: i64,
    pub level: Level,
    pub status: AccountStatus,
}

impl Default for PortfolioState {
    fn default() -> Self {
        Self::with_balance(DEFAULT_BALANCE)
    }
}

impl PortfolioState {
    /// Fresh state with the given starting capital.
    pub fn with_balance(balance: f64) -> Self {
        Self {
            balance,
            cash: balance,
            positions: BTreeMap::new(),
            history: VecDeque::new(),
            score: 0,
            level: Level::Novice,
            status: AccountStatus::Alive,
        }
    }

    /// Cash plus marked value of all open positions. Tickers missing from
    /// `marks` are valued at their entry price (conservative no-op).
    pub fn equity(&self, marks: &BTreeMap<String, f64>) -> f64 {
        let position_value: f64 = self
            .positions
            .iter()
            .map(|(ticker, pos)| {
                let price = marks.get(ticker).copied().unwrap_or(pos.avg_price);
                pos.market_value(price)
            })
            .sum();
        self.cash + position_value
    }

    pub fn has_position(&self, ticker: &str) -> bool {
        self.positions.contains_key(ticker)
    }

    pub fn is_alive(&self) -> bool {
        self.status == AccountStatus::Alive
    }
}
