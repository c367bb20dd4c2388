//! Screen filters — per-bar qualification masks over a time series.
//!
//! Every filter is a pure function: series in, mask plus summary metrics
//! out. Filters hold configuration only, so one instance is safely shared
//! across a worker pool. A composite filter ANDs the masks of its
//! children; the children never see each other's intermediate state.

pub mod composite;
pub mod factory;
pub mod moving_average;
pub mod price_change;
pub mod volume;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TimeSeries;

/// Errors from filter construction.
///
/// Raised when a filter is built, never during evaluation, and never
/// silently corrected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FilterConfigError {
    #[error("{filter}: lookback must be >= 1")]
    ZeroLookback { filter: &'static str },
    #[error("{filter}: min threshold {min} exceeds max threshold {max}")]
    ThresholdOrdering { filter: &'static str, min: f64, max: f64 },
    #[error("{filter}: threshold {value} must not be negative")]
    NegativeThreshold { filter: &'static str, value: f64 },
    #[error("composite filter requires at least one child")]
    EmptyComposite,
}

/// Result of evaluating one filter against one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    /// One entry per bar: true where the bar qualifies.
    pub mask: Vec<bool>,
    /// Summary metrics; `None` marks a metric with no qualifying sample.
    pub metrics: BTreeMap<String, Option<f64>>,
    /// False when the series is shorter than the filter's lookback.
    pub valid: bool,
    /// Populated when `valid` is false.
    pub reason: Option<String>,
}

impl FilterResult {
    /// All-false mask with null metrics, for a series too short to evaluate.
    pub fn insufficient(
        len: usize,
        metric_names: &[String],
        reason: impl Into<String>,
    ) -> Self {
        Self {
            mask: vec![false; len],
            metrics: metric_names.iter().map(|m| (m.clone(), None)).collect(),
            valid: false,
            reason: Some(reason.into()),
        }
    }

    /// Number of qualifying bars.
    pub fn qualifying_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}

/// Trait for screen filters.
///
/// # Architecture invariant
/// `evaluate` is pure — the same series always yields the same mask and
/// metrics. Filters never reference anything beyond the series they are
/// given, which is what makes the per-symbol fan-out lock-free.
pub trait ScreenFilter: Send + Sync {
    /// Human-readable name (e.g., "volume_20", "ma_50_above").
    fn name(&self) -> &str;

    /// Number of bars consumed before the first valid mask entry.
    fn lookback(&self) -> usize;

    /// Metric keys this filter emits, in emission order.
    ///
    /// A composite uses these to report null metrics for children it
    /// skipped while short-circuiting.
    fn metric_names(&self) -> Vec<String>;

    /// Evaluate the filter over the whole series.
    ///
    /// The returned mask always has `series.len()` entries.
    fn evaluate(&self, series: &TimeSeries) -> FilterResult;
}

// Re-export concrete filter types.
pub use composite::CompositeFilter;
pub use factory::{build_filter, FilterSpec};
pub use moving_average::{MaPosition, MovingAverageFilter};
pub use price_change::PriceChangeFilter;
pub use volume::VolumeFilter;

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> TimeSeries {
    make_series_with_volumes(closes, &vec![1_000; closes.len()])
}

/// Like `make_series`, with explicit per-bar volumes.
#[cfg(test)]
pub fn make_series_with_volumes(closes: &[f64], volumes: &[u64]) -> TimeSeries {
    use crate::domain::Bar;
    assert_eq!(closes.len(), volumes.len());
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume,
            }
        })
        .collect();
    TimeSeries::new(bars)
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for filter tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
