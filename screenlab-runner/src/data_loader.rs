//! CSV bar ingestion for the screening universe.
//!
//! One file per symbol: `<dir>/<SYMBOL>.csv` with a
//! `date,open,high,low,close,volume` header. Rows are taken in file
//! order; date-ordering defects are left for the engine's per-symbol
//! validation, so one bad file degrades to a per-symbol error instead of
//! aborting the batch. Producing the files is out of scope.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use screenlab_core::domain::{Bar, TimeSeries};

/// Errors from the bar ingestion layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no bar file for '{symbol}' at {path}")]
    MissingFile { symbol: String, path: PathBuf },
    #[error("failed to read bars for '{symbol}': {source}")]
    Csv {
        symbol: String,
        #[source]
        source: csv::Error,
    },
}

/// One CSV row. Field order matches the header.
#[derive(Debug, Deserialize)]
struct CsvBar {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

impl From<CsvBar> for Bar {
    fn from(row: CsvBar) -> Self {
        Bar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

/// Load one series per symbol from `<dir>/<SYMBOL>.csv`.
///
/// Pairs are returned in the order of `symbols`, ready for the engine.
pub fn load_universe(
    dir: &Path,
    symbols: &[String],
) -> Result<Vec<(String, TimeSeries)>, LoadError> {
    symbols
        .iter()
        .map(|symbol| {
            let series = load_symbol(dir, symbol)?;
            Ok((symbol.clone(), series))
        })
        .collect()
}

fn load_symbol(dir: &Path, symbol: &str) -> Result<TimeSeries, LoadError> {
    let path = dir.join(format!("{symbol}.csv"));
    if !path.exists() {
        return Err(LoadError::MissingFile {
            symbol: symbol.to_string(),
            path,
        });
    }

    let mut reader = csv::Reader::from_path(&path).map_err(|source| LoadError::Csv {
        symbol: symbol.to_string(),
        source,
    })?;

    let mut bars = Vec::new();
    for row in reader.deserialize::<CsvBar>() {
        let row = row.map_err(|source| LoadError::Csv {
            symbol: symbol.to_string(),
            source,
        })?;
        bars.push(Bar::from(row));
    }

    debug!(symbol, bars = bars.len(), "loaded bar file");
    Ok(TimeSeries::new(bars))
}
