//! Screener engine — parallel filter evaluation across a symbol universe.
//!
//! Each unit of work is "evaluate the filter stack for one symbol": pure
//! computation over that symbol's series, no I/O, no shared mutable
//! state. The filter stack is shared read-only across the pool; every
//! worker owns its own intermediate buffers. Results always come back in
//! input order regardless of worker completion order.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use screenlab_core::domain::TimeSeries;
use screenlab_core::filters::{CompositeFilter, FilterConfigError, ScreenFilter};

use crate::aggregate::{aggregate_metrics, MetricAggregation};
use crate::result::{ScreenResult, ScreenerSummary};

/// Batch-level configuration errors.
///
/// Surfaced before any symbol is processed; per-symbol defects never
/// appear here — they land in `ScreenResult.error`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("worker count must be >= 1")]
    InvalidWorkerCount,
    #[error("at least one filter is required")]
    NoFilters,
    #[error(transparent)]
    Filter(#[from] FilterConfigError),
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Worker pool size.
    pub workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// Inclusive date range restricting which bars may qualify a symbol.
/// Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Parallel screening engine.
///
/// Owns a dedicated worker pool sized at construction; the pool is reused
/// across batches. The engine holds no other state — every summary is
/// returned to the caller and forgotten.
pub struct ScreenerEngine {
    pool: rayon::ThreadPool,
}

impl ScreenerEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        if config.workers == 0 {
            return Err(EngineError::InvalidWorkerCount);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()?;
        Ok(Self { pool })
    }

    /// Screen the universe against the AND of `filters`.
    ///
    /// One `ScreenResult` per input symbol, in input order. Symbols whose
    /// series are malformed get an error result; the batch never aborts.
    pub fn screen(
        &self,
        universe: &[(String, TimeSeries)],
        filters: &[Arc<dyn ScreenFilter>],
        range: Option<DateRange>,
    ) -> Result<ScreenerSummary, EngineError> {
        self.screen_with_metrics(universe, filters, range, &[])
    }

    /// Like [`screen`](Self::screen), additionally folding the requested
    /// metrics across the qualifying symbols.
    pub fn screen_with_metrics(
        &self,
        universe: &[(String, TimeSeries)],
        filters: &[Arc<dyn ScreenFilter>],
        range: Option<DateRange>,
        aggregations: &[MetricAggregation],
    ) -> Result<ScreenerSummary, EngineError> {
        let filter = combine(filters)?;
        let started = Instant::now();
        info!(
            symbols = universe.len(),
            workers = self.pool.current_num_threads(),
            filter = filter.name(),
            "screening batch started"
        );

        // Indexed collect writes each result into its input slot, so the
        // output order never depends on worker completion order.
        let results: Vec<ScreenResult> = self.pool.install(|| {
            universe
                .par_iter()
                .map(|(symbol, series)| evaluate_symbol(symbol, series, filter.as_ref(), range))
                .collect()
        });

        let qualifying_symbols: Vec<String> = results
            .iter()
            .filter(|r| r.qualifies)
            .map(|r| r.symbol.clone())
            .collect();
        let aggregated_metrics = if aggregations.is_empty() {
            None
        } else {
            Some(aggregate_metrics(&results, aggregations))
        };

        let execution_time = started.elapsed();
        info!(
            total = results.len(),
            qualifying = qualifying_symbols.len(),
            errors = results.iter().filter(|r| r.error.is_some()).count(),
            elapsed_ms = execution_time.as_millis() as u64,
            "screening batch finished"
        );

        Ok(ScreenerSummary {
            total_screened: results.len(),
            total_qualifying: qualifying_symbols.len(),
            results,
            qualifying_symbols,
            execution_time,
            aggregated_metrics,
        })
    }
}

/// AND-combine the filter list; a single filter is used directly so its
/// metric keys stay unprefixed.
fn combine(filters: &[Arc<dyn ScreenFilter>]) -> Result<Arc<dyn ScreenFilter>, EngineError> {
    match filters {
        [] => Err(EngineError::NoFilters),
        [single] => Ok(Arc::clone(single)),
        many => Ok(Arc::new(CompositeFilter::new(many.to_vec())?)),
    }
}

/// Evaluate one symbol. Structural defects become the symbol's error;
/// they never propagate.
fn evaluate_symbol(
    symbol: &str,
    series: &TimeSeries,
    filter: &dyn ScreenFilter,
    range: Option<DateRange>,
) -> ScreenResult {
    if let Err(err) = series.validate() {
        debug!(symbol, %err, "symbol rejected");
        return ScreenResult::failed(symbol, err.to_string());
    }

    let result = filter.evaluate(series);
    let qualifying_dates: Vec<NaiveDate> = series
        .bars()
        .iter()
        .zip(&result.mask)
        .filter(|(bar, &hit)| hit && range.map_or(true, |r| r.contains(bar.date)))
        .map(|(bar, _)| bar.date)
        .collect();

    ScreenResult {
        symbol: symbol.to_string(),
        qualifies: !qualifying_dates.is_empty(),
        qualifying_dates,
        metrics: result.metrics,
        error: None,
    }
}
