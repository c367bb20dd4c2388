//! Price change filter — N-day percent change of close inside a band.
//!
//! change[i] = (close[i] - close[i-period_days]) / close[i-period_days] * 100
//! Lookback: period_days. A zero close in the denominator invalidates that
//! index only; it is never a fatal error.

use std::collections::BTreeMap;

use crate::domain::TimeSeries;
use crate::rolling;

use super::{FilterConfigError, FilterResult, ScreenFilter};

#[derive(Debug, Clone)]
pub struct PriceChangeFilter {
    min_change_pct: f64,
    max_change_pct: f64,
    period_days: usize,
    name: String,
}

impl PriceChangeFilter {
    pub fn new(
        min_change_pct: f64,
        max_change_pct: f64,
        period_days: usize,
    ) -> Result<Self, FilterConfigError> {
        if period_days == 0 {
            return Err(FilterConfigError::ZeroLookback {
                filter: "price_change",
            });
        }
        if max_change_pct < min_change_pct {
            return Err(FilterConfigError::ThresholdOrdering {
                filter: "price_change",
                min: min_change_pct,
                max: max_change_pct,
            });
        }
        Ok(Self {
            min_change_pct,
            max_change_pct,
            period_days,
            name: format!("price_change_{period_days}"),
        })
    }
}

impl ScreenFilter for PriceChangeFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period_days
    }

    fn metric_names(&self) -> Vec<String> {
        vec!["pct_change_mean".to_string(), "pct_change_std".to_string()]
    }

    fn evaluate(&self, series: &TimeSeries) -> FilterResult {
        let n = series.len();
        if n < self.period_days + 1 {
            return FilterResult::insufficient(
                n,
                &self.metric_names(),
                format!(
                    "insufficient history: need {} bars, have {n}",
                    self.period_days + 1
                ),
            );
        }

        let change = rolling::pct_change(&series.closes(), self.period_days);

        let mut mask = vec![false; n];
        let mut qualifying = Vec::new();
        for (i, &pct) in change.iter().enumerate() {
            if pct.is_nan() {
                continue;
            }
            if pct >= self.min_change_pct && pct <= self.max_change_pct {
                mask[i] = true;
                qualifying.push(pct);
            }
        }

        let mut metrics = BTreeMap::new();
        metrics.insert("pct_change_mean".to_string(), rolling::mean(&qualifying));
        metrics.insert("pct_change_std".to_string(), rolling::std_dev(&qualifying));

        FilterResult {
            mask,
            metrics,
            valid: true,
            reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{assert_approx, make_series, DEFAULT_EPSILON};

    #[test]
    fn rejects_zero_period() {
        assert_eq!(
            PriceChangeFilter::new(-5.0, 5.0, 0).unwrap_err(),
            FilterConfigError::ZeroLookback {
                filter: "price_change"
            }
        );
    }

    #[test]
    fn rejects_inverted_band() {
        assert!(matches!(
            PriceChangeFilter::new(5.0, -5.0, 1),
            Err(FilterConfigError::ThresholdOrdering { .. })
        ));
    }

    #[test]
    fn one_day_gainers() {
        // 100 -> 110 (+10%) -> 99 (-10%) -> 104 (+5.05..%)
        let series = make_series(&[100.0, 110.0, 99.0, 104.0]);
        let filter = PriceChangeFilter::new(2.0, 100.0, 1).unwrap();
        let result = filter.evaluate(&series);
        assert_eq!(result.mask, vec![false, true, false, true]);
    }

    #[test]
    fn warmup_indices_never_qualify() {
        let series = make_series(&[100.0, 100.0, 100.0, 100.0]);
        let filter = PriceChangeFilter::new(-1.0, 1.0, 2).unwrap();
        let result = filter.evaluate(&series);
        assert_eq!(result.mask, vec![false, false, true, true]);
    }

    #[test]
    fn zero_close_invalidates_index_only() {
        let mut series = make_series(&[100.0, 100.0, 100.0]).bars().to_vec();
        series[0].close = 0.0;
        let series = TimeSeries::new(series);
        let filter = PriceChangeFilter::new(-100.0, 100.0, 1).unwrap();
        let result = filter.evaluate(&series);
        // change[1] has a zero denominator; change[2] is fine (0%)
        assert!(result.valid);
        assert_eq!(result.mask, vec![false, false, true]);
    }

    #[test]
    fn volatility_metrics() {
        // Changes at indices 1..: +10%, -10%; band admits both
        let series = make_series(&[100.0, 110.0, 99.0]);
        let filter = PriceChangeFilter::new(-50.0, 50.0, 1).unwrap();
        let result = filter.evaluate(&series);
        assert_approx(result.metrics["pct_change_mean"].unwrap(), 0.0, DEFAULT_EPSILON);
        assert_approx(result.metrics["pct_change_std"].unwrap(), 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn short_series_is_invalid() {
        let series = make_series(&[100.0]);
        let filter = PriceChangeFilter::new(-5.0, 5.0, 1).unwrap();
        let result = filter.evaluate(&series);
        assert!(!result.valid);
        assert_eq!(result.mask, vec![false]);
        assert!(result.metrics.values().all(|v| v.is_none()));
    }

    #[test]
    fn filter_name_includes_period() {
        assert_eq!(
            PriceChangeFilter::new(-5.0, 5.0, 5).unwrap().name(),
            "price_change_5"
        );
    }
}
