//! Volume filter — trailing average volume inside a band.
//!
//! Qualifies bars whose `lookback_days`-day trailing average volume lies
//! within [min_threshold, max_threshold]. An absent max is unbounded.
//! Lookback: lookback_days - 1 (first valid value at index lookback_days-1).

use std::collections::BTreeMap;

use crate::domain::TimeSeries;
use crate::rolling;

use super::{FilterConfigError, FilterResult, ScreenFilter};

#[derive(Debug, Clone)]
pub struct VolumeFilter {
    lookback_days: usize,
    min_threshold: f64,
    max_threshold: Option<f64>,
    name: String,
}

impl VolumeFilter {
    pub fn new(
        lookback_days: usize,
        min_threshold: f64,
        max_threshold: Option<f64>,
    ) -> Result<Self, FilterConfigError> {
        if lookback_days == 0 {
            return Err(FilterConfigError::ZeroLookback { filter: "volume" });
        }
        if min_threshold < 0.0 {
            return Err(FilterConfigError::NegativeThreshold {
                filter: "volume",
                value: min_threshold,
            });
        }
        if let Some(max) = max_threshold {
            if max < min_threshold {
                return Err(FilterConfigError::ThresholdOrdering {
                    filter: "volume",
                    min: min_threshold,
                    max,
                });
            }
        }
        Ok(Self {
            lookback_days,
            min_threshold,
            max_threshold,
            name: format!("volume_{lookback_days}"),
        })
    }
}

impl ScreenFilter for VolumeFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.lookback_days - 1
    }

    fn metric_names(&self) -> Vec<String> {
        vec![
            "avg_volume_mean".to_string(),
            "avg_volume_min".to_string(),
            "avg_volume_max".to_string(),
        ]
    }

    fn evaluate(&self, series: &TimeSeries) -> FilterResult {
        let n = series.len();
        if n < self.lookback_days {
            return FilterResult::insufficient(
                n,
                &self.metric_names(),
                format!(
                    "insufficient history: need {} bars, have {n}",
                    self.lookback_days
                ),
            );
        }

        let avg_volume = rolling::rolling_mean(&series.volumes(), self.lookback_days);

        let mut mask = vec![false; n];
        let mut qualifying = Vec::new();
        for (i, &avg) in avg_volume.iter().enumerate() {
            if avg.is_nan() {
                continue;
            }
            let in_band =
                avg >= self.min_threshold && self.max_threshold.map_or(true, |max| avg <= max);
            if in_band {
                mask[i] = true;
                qualifying.push(avg);
            }
        }

        let mut metrics = BTreeMap::new();
        metrics.insert("avg_volume_mean".to_string(), rolling::mean(&qualifying));
        metrics.insert(
            "avg_volume_min".to_string(),
            qualifying.iter().copied().reduce(f64::min),
        );
        metrics.insert(
            "avg_volume_max".to_string(),
            qualifying.iter().copied().reduce(f64::max),
        );

        FilterResult {
            mask,
            metrics,
            valid: true,
            reason: None,
        }
    }
}
