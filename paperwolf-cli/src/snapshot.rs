//! Snapshot and history inputs — CSV adapters feeding the core seams.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;

use paperwolf_core::{
    CandlePoint, HistoryError, HistoryProvider, MomentumSnapshot, VolatilitySnapshot,
};

/// One row of the market snapshot CSV: precomputed features for a ticker.
#[derive(Debug, Deserialize)]
pub struct SnapshotRow {
    pub ticker: String,
    pub close: f64,
    pub vwap: f64,
    pub rsi: f64,
    pub volume_z: f64,
    pub hv_rank: f64,
}

impl SnapshotRow {
    pub fn momentum(&self) -> MomentumSnapshot {
        MomentumSnapshot {
            ticker: self.ticker.clone(),
            close: self.close,
            vwap: self.vwap,
            rsi: self.rsi,
            volume_z: self.volume_z,
        }
    }

    pub fn volatility(&self) -> VolatilitySnapshot {
        VolatilitySnapshot {
            ticker: self.ticker.clone(),
            hv_rank: self.hv_rank,
        }
    }
}

/// Read the full snapshot CSV (headered).
pub fn read_snapshot(path: &Path) -> Result<Vec<SnapshotRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for (i, record) in reader.deserialize().enumerate() {
        let row: SnapshotRow = record.with_context(|| format!("snapshot row {}", i + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// History row format: `time,close,volume` with minute-resolution timestamps.
#[derive(Debug, Deserialize)]
struct HistoryRow {
    time: String,
    close: f64,
    volume: u64,
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// File-backed history source: one `<ticker>.csv` per ticker.
pub struct CsvHistoryProvider {
    dir: PathBuf,
}

impl CsvHistoryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl HistoryProvider for CsvHistoryProvider {
    fn recent_history(&self, ticker: &str) -> Result<Vec<CandlePoint>, HistoryError> {
        let path = self.dir.join(format!("{ticker}.csv"));
        if !path.exists() {
            return Err(HistoryError::Missing(ticker.to_string()));
        }
        let mut reader = csv::Reader::from_path(&path)
            .map_err(|err| HistoryError::Source(err.to_string()))?;

        let mut points = Vec::new();
        for record in reader.deserialize() {
            let row: HistoryRow = record.map_err(|err| HistoryError::Source(err.to_string()))?;
            let time = NaiveDateTime::parse_from_str(&row.time, TIME_FORMAT)
                .map_err(|err| HistoryError::Source(format!("bad timestamp '{}': {err}", row.time)))?;
            points.push(CandlePoint {
                time,
                close: row.close,
                volume: row.volume,
            });
        }
        Ok(points)
    }
}
