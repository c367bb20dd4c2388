//! Moving average filter — close position relative to its SMA.
//!
//! Qualifies bars whose close is strictly above (or below, per
//! `position`) the simple moving average over `period` bars. A close
//! exactly on the SMA qualifies under neither position.
//! Lookback: period - 1.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::TimeSeries;
use crate::rolling;

use super::{FilterConfigError, FilterResult, ScreenFilter};

/// Which side of the moving average qualifies a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaPosition {
    /// Close must be strictly above the SMA.
    Above,
    /// Close must be strictly below the SMA.
    Below,
}

#[derive(Debug, Clone)]
pub struct MovingAverageFilter {
    period: usize,
    position: MaPosition,
    name: String,
}

impl MovingAverageFilter {
    pub fn new(period: usize, position: MaPosition) -> Result<Self, FilterConfigError> {
        if period == 0 {
            return Err(FilterConfigError::ZeroLookback {
                filter: "moving_average",
            });
        }
        let side = match position {
            MaPosition::Above => "above",
            MaPosition::Below => "below",
        };
        Ok(Self {
            period,
            position,
            name: format!("ma_{period}_{side}"),
        })
    }
}

impl ScreenFilter for MovingAverageFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn metric_names(&self) -> Vec<String> {
        vec![
            "ma_distance_pct".to_string(),
            "ma_distance_pct_mean".to_string(),
        ]
    }

    fn evaluate(&self, series: &TimeSeries) -> FilterResult {
        let n = series.len();
        if n < self.period {
            return FilterResult::insufficient(
                n,
                &self.metric_names(),
                format!("insufficient history: need {} bars, have {n}", self.period),
            );
        }

        let closes = series.closes();
        let sma = rolling::rolling_mean(&closes, self.period);

        let mut mask = vec![false; n];
        let mut qualifying_distances = Vec::new();
        let mut latest_distance = None;
        for i in 0..n {
            let avg = sma[i];
            let close = closes[i];
            if avg.is_nan() || close.is_nan() || avg == 0.0 {
                continue;
            }
            let distance_pct = (close - avg) / avg * 100.0;
            latest_distance = Some(distance_pct);
            let in_position = match self.position {
                MaPosition::Above => close > avg,
                MaPosition::Below => close < avg,
            };
            if in_position {
                mask[i] = true;
                qualifying_distances.push(distance_pct);
            }
        }

        let mut metrics = BTreeMap::new();
        metrics.insert("ma_distance_pct".to_string(), latest_distance);
        metrics.insert(
            "ma_distance_pct_mean".to_string(),
            rolling::mean(&qualifying_distances),
        );

        FilterResult {
            mask,
            metrics,
            valid: true,
            reason: None,
        }
    }
}
