//! Domain types shared across the fusion and simulation layers.

mod candle;
mod decision;
mod vote;

pub use candle::CandlePoint;
pub use decision::{Decision, TradeAction};
pub use vote::{SignalClass, Vote};
