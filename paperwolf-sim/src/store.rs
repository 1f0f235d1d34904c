//! State persistence — the portfolio document behind a small load/save seam.
//!
//! Read failures (missing file, malformed document) are recoverable: the
//! engine falls back to the default state. Write failures are fatal for
//! the tick that triggered them and are propagated to the caller.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::portfolio::PortfolioState;

/// Errors from persisting state. Load-side problems never surface here;
/// they degrade to `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialize portfolio state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("write portfolio state: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable storage for the single portfolio document.
pub trait StateStore: Send {
    /// Load the persisted state. `None` when absent or unreadable.
    fn load(&self) -> Option<PortfolioState>;

    /// Overwrite the persisted state with the given snapshot.
    fn save(&mut self, state: &PortfolioState) -> Result<(), StoreError>;
}

/// File-backed store: one pretty-printed JSON document.
///
/// Saves are atomic: the document is written to a sibling temp file,
/// synced, then renamed over the target, so a crash mid-write cannot
/// leave a torn document behind.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Option<PortfolioState> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "corrupt state document, using defaults");
                None
            }
        }
    }

    fn save(&mut self, state: &PortfolioState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    state: Option<PortfolioState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a state, as if a previous process persisted it.
    pub fn seeded(state: PortfolioState) -> Self {
        Self { state: Some(state) }
    }

    /// The last saved snapshot, if any.
    pub fn saved(&self) -> Option<&PortfolioState> {
        self.state.as_ref()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Option<PortfolioState> {
        self.state.clone()
    }

    fn save(&mut self, state: &PortfolioState) -> Result<(), StoreError> {
        self.state = Some(state.clone());
        Ok(())
    }
}
