//! Screen result containers.
//!
//! Both types are plain data: produced once per run, serializable, and
//! owned by the caller. The engine retains nothing after returning them.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome for a single symbol in a screening batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenResult {
    pub symbol: String,

    /// True when at least one bar in the requested date range passed
    /// every filter.
    pub qualifies: bool,

    /// Dates whose bars passed every filter, in chronological order.
    pub qualifying_dates: Vec<NaiveDate>,

    /// Metric map from the filter evaluation; `None` marks a metric with
    /// no qualifying sample.
    pub metrics: BTreeMap<String, Option<f64>>,

    /// Populated when the symbol's series could not be evaluated. An
    /// errored symbol never qualifies and never feeds aggregation.
    pub error: Option<String>,
}

impl ScreenResult {
    /// Result for a symbol whose series could not be evaluated.
    pub fn failed(symbol: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            qualifies: false,
            qualifying_dates: Vec::new(),
            metrics: BTreeMap::new(),
            error: Some(error.into()),
        }
    }
}

/// Batch-level summary returned by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerSummary {
    /// One result per input symbol, in input order.
    pub results: Vec<ScreenResult>,

    /// Symbols with at least one qualifying bar, in input order.
    pub qualifying_symbols: Vec<String>,

    pub total_screened: usize,
    pub total_qualifying: usize,

    /// Wall-clock time for the whole batch. Individual symbols are not
    /// timed.
    pub execution_time: Duration,

    /// Present only when aggregations were requested.
    pub aggregated_metrics: Option<BTreeMap<String, Option<f64>>>,
}
