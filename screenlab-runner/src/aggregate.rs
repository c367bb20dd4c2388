//! Cross-symbol metric aggregation.
//!
//! After per-symbol evaluation, requested metrics are folded across the
//! qualifying set. Null and missing values are excluded from every
//! aggregate; an aggregation that matched zero values reports null,
//! never NaN or zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::result::ScreenResult;

/// How to fold one metric across the qualifying symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Aggregation {
    Mean,
    Min,
    Max,
    Sum,
    Count,
}

impl Aggregation {
    fn key_suffix(&self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Sum => "sum",
            Aggregation::Count => "count",
        }
    }

    fn apply(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(match self {
            Aggregation::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregation::Sum => values.iter().sum(),
            Aggregation::Count => values.len() as f64,
        })
    }
}

/// A request to aggregate one metric across the qualifying set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAggregation {
    /// Metric key to match exactly, or a prefix when it ends in `*`
    /// (e.g. `volume_20.*` matches every metric of that child).
    pub pattern: String,
    pub aggregation: Aggregation,
}

impl MetricAggregation {
    pub fn new(pattern: impl Into<String>, aggregation: Aggregation) -> Self {
        Self {
            pattern: pattern.into(),
            aggregation,
        }
    }

    fn matches(&self, key: &str) -> bool {
        match self.pattern.strip_suffix('*') {
            Some(prefix) => key.starts_with(prefix),
            None => key == self.pattern,
        }
    }

    /// Key under which the aggregate is reported.
    fn output_key(&self) -> String {
        format!("{}_{}", self.pattern, self.aggregation.key_suffix())
    }
}

/// Fold the requested metrics across all qualifying, non-errored results.
pub fn aggregate_metrics(
    results: &[ScreenResult],
    requests: &[MetricAggregation],
) -> BTreeMap<String, Option<f64>> {
    let mut out = BTreeMap::new();
    for request in requests {
        let mut values = Vec::new();
        for result in results.iter().filter(|r| r.error.is_none() && r.qualifies) {
            for (key, value) in &result.metrics {
                if !request.matches(key) {
                    continue;
                }
                if let Some(v) = value {
                    if !v.is_nan() {
                        values.push(*v);
                    }
                }
            }
        }
        out.insert(request.output_key(), request.aggregation.apply(&values));
    }
    out
}
