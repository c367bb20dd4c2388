//! Rolling-window kernels shared by the screen filters.
//!
//! Every kernel is O(N) over the input: the window is maintained
//! incrementally, never recomputed per index. Warmup indices are NaN.

/// Trailing mean over `window` values.
///
/// Indices before `window - 1` are NaN. A NaN anywhere in the window
/// poisons that index's output.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "window must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < window {
        return result;
    }

    // Compute initial window sum
    let mut sum = 0.0;
    let mut nan_in_window = false;
    for &v in values.iter().take(window) {
        if v.is_nan() {
            nan_in_window = true;
        }
        sum += v;
    }

    if !nan_in_window {
        result[window - 1] = sum / window as f64;
    }

    // Roll the window forward
    for i in window..n {
        let leaving = values[i - window];
        let entering = values[i];
        sum = sum - leaving + entering;

        // A NaN entering or leaving corrupts the running sum; rescan the
        // window to restore it and re-detect contamination.
        if entering.is_nan() || leaving.is_nan() || nan_in_window {
            nan_in_window = false;
            sum = 0.0;
            for &v in &values[(i + 1 - window)..=i] {
                if v.is_nan() {
                    nan_in_window = true;
                }
                sum += v;
            }
            if nan_in_window {
                result[i] = f64::NAN;
                continue;
            }
        }

        result[i] = sum / window as f64;
    }

    result
}

/// Percentage change over `period` values:
/// `(v[i] - v[i-period]) / v[i-period] * 100`.
///
/// The first `period` indices are NaN. A zero or NaN denominator yields
/// NaN for that index, never an error.
pub fn pct_change(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "period must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    for i in period..n {
        let prev = values[i - period];
        let curr = values[i];
        if prev.is_nan() || curr.is_nan() || prev == 0.0 {
            result[i] = f64::NAN;
        } else {
            result[i] = (curr - prev) / prev * 100.0;
        }
    }

    result
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation; `None` for an empty slice.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}
