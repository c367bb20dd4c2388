//! Property tests for filter invariants.
//!
//! Uses proptest to verify:
//! 1. Rolling mean matches a naive per-index reference on random series
//! 2. Above/below MA masks are complementary at valid indices
//! 3. Composite mask equals the elementwise AND of its children's masks

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use screenlab_core::domain::{Bar, TimeSeries};
use screenlab_core::filters::{
    CompositeFilter, MaPosition, MovingAverageFilter, PriceChangeFilter, ScreenFilter,
    VolumeFilter,
};
use screenlab_core::rolling;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0),
        0..120,
    )
}

fn arb_window() -> impl Strategy<Value = usize> {
    1..25_usize
}

fn make_series(closes: &[f64], volumes: &[u64]) -> TimeSeries {
    let base_date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let bars = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume,
        })
        .collect();
    TimeSeries::new(bars)
}

/// Naive O(N·L) rolling mean used as the reference implementation.
fn naive_rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                f64::NAN
            } else {
                let slice = &values[i + 1 - window..=i];
                slice.iter().sum::<f64>() / window as f64
            }
        })
        .collect()
}

// ── 1. Rolling mean vs naive reference ───────────────────────────────

proptest! {
    /// The incremental rolling mean agrees with the per-index recompute
    /// at every position, and warmup indices are NaN.
    #[test]
    fn rolling_mean_matches_naive(values in arb_closes(), window in arb_window()) {
        let fast = rolling::rolling_mean(&values, window);
        let naive = naive_rolling_mean(&values, window);
        prop_assert_eq!(fast.len(), values.len());
        for i in 0..values.len() {
            if i + 1 < window {
                prop_assert!(fast[i].is_nan(), "expected warmup NaN at {}", i);
            } else {
                prop_assert!(
                    (fast[i] - naive[i]).abs() < 1e-6,
                    "mismatch at {}: fast={} naive={}", i, fast[i], naive[i]
                );
            }
        }
    }

    /// Volume filter mask length always equals series length, and no
    /// warmup index ever qualifies.
    #[test]
    fn volume_mask_shape(closes in arb_closes(), window in arb_window()) {
        let volumes: Vec<u64> = (0..closes.len() as u64).map(|i| 1_000 + i).collect();
        let series = make_series(&closes, &volumes);
        let filter = VolumeFilter::new(window, 0.0, None).unwrap();
        let result = filter.evaluate(&series);
        prop_assert_eq!(result.mask.len(), series.len());
        for i in 0..series.len().min(window.saturating_sub(1)) {
            prop_assert!(!result.mask[i], "warmup index {} qualified", i);
        }
    }
}

// ── 2. Above/below complementarity ───────────────────────────────────

proptest! {
    /// At every index where the SMA is defined, a bar is never both above
    /// and below, and it is neither only when close sits exactly on the SMA.
    #[test]
    fn above_below_masks_are_complementary(closes in arb_closes(), window in arb_window()) {
        let volumes = vec![1_000_u64; closes.len()];
        let series = make_series(&closes, &volumes);
        let above = MovingAverageFilter::new(window, MaPosition::Above).unwrap();
        let below = MovingAverageFilter::new(window, MaPosition::Below).unwrap();
        let above_mask = above.evaluate(&series).mask;
        let below_mask = below.evaluate(&series).mask;
        let sma = rolling::rolling_mean(&closes, window);

        for i in 0..closes.len() {
            prop_assert!(
                !(above_mask[i] && below_mask[i]),
                "index {} qualified on both sides", i
            );
            if !sma[i].is_nan() && closes[i] != sma[i] {
                prop_assert!(
                    above_mask[i] || below_mask[i],
                    "index {} qualified on neither side (close={}, sma={})",
                    i, closes[i], sma[i]
                );
            }
        }
    }
}

// ── 3. Composite AND law ─────────────────────────────────────────────

proptest! {
    /// The composite mask is exactly the elementwise AND of its children,
    /// and is false wherever any child is inside its warmup.
    #[test]
    fn composite_mask_is_and_of_children(
        closes in arb_closes(),
        ma_period in arb_window(),
        pc_period in 1..10_usize,
        vol_window in arb_window(),
    ) {
        let volumes: Vec<u64> = closes.iter().map(|c| (c * 2_000.0) as u64).collect();
        let series = make_series(&closes, &volumes);

        let children: Vec<Arc<dyn ScreenFilter>> = vec![
            Arc::new(VolumeFilter::new(vol_window, 100_000.0, None).unwrap()),
            Arc::new(PriceChangeFilter::new(-10.0, 10.0, pc_period).unwrap()),
            Arc::new(MovingAverageFilter::new(ma_period, MaPosition::Above).unwrap()),
        ];
        let child_masks: Vec<Vec<bool>> = children
            .iter()
            .map(|c| c.evaluate(&series).mask)
            .collect();

        let composite = CompositeFilter::new(children).unwrap();
        let result = composite.evaluate(&series);

        let max_lookback = ma_period.max(pc_period + 1).max(vol_window) - 1;
        for i in 0..closes.len() {
            let expected = child_masks.iter().all(|mask| mask[i]);
            prop_assert_eq!(result.mask[i], expected, "AND mismatch at {}", i);
            if i < max_lookback {
                prop_assert!(!result.mask[i], "warmup index {} qualified", i);
            }
        }
    }
}
