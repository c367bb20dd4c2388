//! TimeSeries — ordered daily bars for one symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Bar;

/// Structural defects that make a series unusable for screening.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("series is empty")]
    Empty,
    #[error("bar dates must be strictly increasing (violation at index {index})")]
    NonIncreasingDates { index: usize },
}

/// Ordered sequence of daily bars for one symbol.
///
/// Construction is infallible; `validate()` reports structural defects as
/// values so a screening batch can degrade them to per-symbol errors
/// instead of aborting. A series is never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    bars: Vec<Bar>,
}

impl TimeSeries {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close column.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volume column, widened to f64 for the rolling kernels.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    /// Date column.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Check the series is non-empty with strictly increasing dates.
    ///
    /// Called per symbol by the engine; a failing series becomes that
    /// symbol's error, not a batch failure.
    pub fn validate(&self) -> Result<(), SeriesError> {
        if self.bars.is_empty() {
            return Err(SeriesError::Empty);
        }
        for (index, pair) in self.bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::NonIncreasingDates { index: index + 1 });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_series(dates: &[(i32, u32, u32)]) -> TimeSeries {
        let bars = dates
            .iter()
            .map(|&(y, m, d)| Bar {
                date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.5,
                volume: 1_000,
            })
            .collect();
        TimeSeries::new(bars)
    }

    #[test]
    fn validate_accepts_increasing_dates() {
        let series = make_series(&[(2024, 1, 2), (2024, 1, 3), (2024, 1, 5)]);
        assert!(series.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty() {
        let series = TimeSeries::new(vec![]);
        assert_eq!(series.validate(), Err(SeriesError::Empty));
    }

    #[test]
    fn validate_rejects_duplicate_date() {
        let series = make_series(&[(2024, 1, 2), (2024, 1, 2)]);
        assert_eq!(
            series.validate(),
            Err(SeriesError::NonIncreasingDates { index: 1 })
        );
    }

    #[test]
    fn validate_rejects_backwards_date() {
        let series = make_series(&[(2024, 1, 2), (2024, 1, 5), (2024, 1, 4)]);
        assert_eq!(
            series.validate(),
            Err(SeriesError::NonIncreasingDates { index: 2 })
        );
    }

    #[test]
    fn column_accessors() {
        let series = make_series(&[(2024, 1, 2), (2024, 1, 3)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![100.5, 100.5]);
        assert_eq!(series.volumes(), vec![1_000.0, 1_000.0]);
        assert_eq!(
            series.dates()[0],
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }
}
