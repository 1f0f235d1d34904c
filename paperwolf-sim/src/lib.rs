//! Paperwolf Sim — the stateful half: portfolio, ticks, survival, persistence.
//!
//! This crate builds on `paperwolf-core` to provide:
//! - The portfolio aggregate (cash, positions, score, level, status)
//! - The tick state machine (exits, entries, mark-to-market, survival)
//! - Durable persistence behind the `StateStore` seam
//! - TOML-loadable engine configuration
//! - The scan orchestration used by the CLI
//!
//! The engine is single-threaded: a tick is a blocking sequence of
//! in-memory mutations followed by a full-state write. Callers needing
//! concurrent access must serialize `process_tick`/`reset` externally.

pub mod config;
pub mod engine;
pub mod portfolio;
pub mod scan;
pub mod store;

pub use config::{ConfigError, SimConfig};
pub use engine::SimulationEngine;
pub use portfolio::{AccountStatus, Level, PortfolioState, Position};
pub use scan::{run_scan, ScanReport};
pub use store::{JsonFileStore, MemoryStore, StateStore, StoreError};
