//! Decision fusion — the regime rule table merging two expert votes.
//!
//! The volatility ("income") expert sets the regime; the momentum
//! ("sniper") expert supplies the trigger. Fusion is stateless and
//! deterministic: one decision per ticker, no I/O, no ordering imposed
//! (callers rank by confidence for display).

use std::collections::{BTreeSet, HashMap};

use crate::domain::{Decision, SignalClass, TradeAction, Vote};

/// Confidence boost applied to the perfect low-vol + momentum setup.
///
/// Deliberately uncapped: a strong enough pair of votes can push the fused
/// confidence above 1.0.
const SNIPER_BOOST: f64 = 0.10;

/// Fuse one ticker's pair of votes into a decision.
///
/// Rule table, in priority order:
/// 1. INCOME regime: BULL_PUT_SPREAD if the sniper agrees, IRON_CONDOR otherwise.
/// 2. SNIPER_PREP regime: LONG_CALL_SNIPER on a trigger, WATCH_FOR_BREAKOUT otherwise.
/// 3. Normal regime: LONG_STOCK on a trigger, WAIT otherwise.
///
/// The `is_buy_signal` and `volume_confirmed` flags are fixed here so that
/// nothing downstream has to re-derive them from prose.
pub fn fuse(income: &Vote, sniper: &Vote, price: f64) -> Decision {
    debug_assert_eq!(income.ticker, sniper.ticker);

    let mut rationale: Vec<String> = Vec::new();
    let sniper_agrees = sniper.signal == SignalClass::Buy;

    let (action, confidence) = match income.signal {
        SignalClass::Income => {
            rationale.push(format!(
                "Regime: high volatility ({:.2})",
                income.confidence
            ));
            if sniper_agrees {
                rationale.push(
                    "Hybrid resolution: high vol + bullish momentum -> credit spread".to_string(),
                );
                (
                    TradeAction::BullPutSpread,
                    (income.confidence + sniper.confidence) / 2.0,
                )
            } else {
                rationale.push("Pure volatility play: sell neutral premium".to_string());
                (TradeAction::IronCondor, income.confidence)
            }
        }
        SignalClass::SniperPrep => {
            rationale.push("Regime: low volatility (coiled)".to_string());
            if sniper_agrees {
                rationale.push("Perfect setup: vol expansion + trend".to_string());
                (
                    TradeAction::LongCallSniper,
                    income.confidence.max(sniper.confidence) + SNIPER_BOOST,
                )
            } else {
                rationale.push("Stalking: waiting for the momentum trigger".to_string());
                (TradeAction::WatchForBreakout, 0.5)
            }
        }
        SignalClass::Buy | SignalClass::Neutral => {
            if sniper_agrees {
                rationale.push(format!(
                    "Regime: normal. Following momentum ({})",
                    sniper.reason
                ));
                (TradeAction::LongStock, sniper.confidence)
            } else {
                rationale.push("Market is efficient. No edge detected".to_string());
                (TradeAction::Wait, 0.0)
            }
        }
    };

    Decision {
        ticker: income.ticker.clone(),
        action,
        confidence,
        rationale,
        price,
        history: Vec::new(),
        is_buy_signal: action.is_long_delta(),
        volume_confirmed: sniper.mentions_volume() || income.mentions_volume(),
    }
}

/// Fuse the union of tickers present in either vote set.
///
/// Missing votes default to neutral; tickers absent from `prices` get a
/// 0.0 price and are later skipped for entry consideration. Output order
/// is the sorted ticker order (deterministic); no confidence ranking is
/// applied here.
pub fn fuse_batch(
    income_votes: &[Vote],
    sniper_votes: &[Vote],
    prices: &HashMap<String, f64>,
) -> Vec<Decision> {
    let income_map: HashMap<&str, &Vote> = income_votes
        .iter()
        .map(|v| (v.ticker.as_str(), v))
        .collect();
    let sniper_map: HashMap<&str, &Vote> = sniper_votes
        .iter()
        .map(|v| (v.ticker.as_str(), v))
        .collect();

    let tickers: BTreeSet<&str> = income_map
        .keys()
        .chain(sniper_map.keys())
        .copied()
        .collect();

    tickers
        .into_iter()
        .map(|ticker| {
            let neutral = Vote::neutral(ticker);
            let income = income_map.get(ticker).copied().unwrap_or(&neutral);
            let sniper = sniper_map.get(ticker).copied().unwrap_or(&neutral);
            let price = prices.get(ticker).copied().unwrap_or(0.0);
            fuse(income, sniper, price)
        })
        .collect()
}

/// Rank decisions by descending confidence (ticker as a stable tiebreak).
///
/// Display-side concern; fusion output itself is unordered by contract.
pub fn rank_by_confidence(decisions: &mut [Decision]) {
    decisions.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
}
