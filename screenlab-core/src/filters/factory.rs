//! Filter factory — converts serializable `FilterSpec`s into runtime
//! trait objects.
//!
//! Specs nest: a composite spec holds child specs, so arbitrarily nested
//! AND-combinations come from configuration alone.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    CompositeFilter, FilterConfigError, MaPosition, MovingAverageFilter, PriceChangeFilter,
    ScreenFilter, VolumeFilter,
};

/// Serializable filter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterSpec {
    /// Trailing average volume inside [min_threshold, max_threshold].
    Volume {
        lookback_days: usize,
        min_threshold: f64,
        #[serde(default)]
        max_threshold: Option<f64>,
    },

    /// N-day percent change of close inside [min_change_pct, max_change_pct].
    PriceChange {
        min_change_pct: f64,
        max_change_pct: f64,
        period_days: usize,
    },

    /// Close strictly above/below its simple moving average.
    MovingAverage { period: usize, position: MaPosition },

    /// Logical AND of the child filters.
    Composite { children: Vec<FilterSpec> },
}

/// Build a runtime filter from a spec.
///
/// Construction errors (zero lookback, inverted thresholds, empty
/// composite) surface here, before any series is touched.
pub fn build_filter(spec: &FilterSpec) -> Result<Arc<dyn ScreenFilter>, FilterConfigError> {
    match spec {
        FilterSpec::Volume {
            lookback_days,
            min_threshold,
            max_threshold,
        } => Ok(Arc::new(VolumeFilter::new(
            *lookback_days,
            *min_threshold,
            *max_threshold,
        )?)),
        FilterSpec::PriceChange {
            min_change_pct,
            max_change_pct,
            period_days,
        } => Ok(Arc::new(PriceChangeFilter::new(
            *min_change_pct,
            *max_change_pct,
            *period_days,
        )?)),
        FilterSpec::MovingAverage { period, position } => {
            Ok(Arc::new(MovingAverageFilter::new(*period, *position)?))
        }
        FilterSpec::Composite { children } => {
            let built = children
                .iter()
                .map(build_filter)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Arc::new(CompositeFilter::new(built)?))
        }
    }
}
