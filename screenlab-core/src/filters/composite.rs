//! Composite filter — logical AND over an ordered list of filters.
//!
//! Every child receives the same immutable series and shares no state
//! with its siblings. A bar qualifies iff it qualifies under every child;
//! a bar any child leaves invalid (warmup, zero denominator) is excluded.
//! Composites nest: a composite is itself a `ScreenFilter`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::TimeSeries;

use super::{FilterConfigError, FilterResult, ScreenFilter};

pub struct CompositeFilter {
    children: Vec<Arc<dyn ScreenFilter>>,
    lookback: usize,
}

impl CompositeFilter {
    pub fn new(children: Vec<Arc<dyn ScreenFilter>>) -> Result<Self, FilterConfigError> {
        if children.is_empty() {
            return Err(FilterConfigError::EmptyComposite);
        }
        let lookback = children.iter().map(|c| c.lookback()).max().unwrap_or(0);
        Ok(Self { children, lookback })
    }

    /// Metric key prefix per child: the child's name, with `_2`, `_3`, …
    /// appended when several children share one.
    fn child_prefixes(&self) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        self.children
            .iter()
            .map(|child| {
                let seen = counts.entry(child.name()).or_insert(0);
                *seen += 1;
                if *seen == 1 {
                    child.name().to_string()
                } else {
                    format!("{}_{seen}", child.name())
                }
            })
            .collect()
    }
}

impl ScreenFilter for CompositeFilter {
    fn name(&self) -> &str {
        "composite"
    }

    fn lookback(&self) -> usize {
        self.lookback
    }

    fn metric_names(&self) -> Vec<String> {
        self.children
            .iter()
            .zip(self.child_prefixes())
            .flat_map(|(child, prefix)| {
                child
                    .metric_names()
                    .into_iter()
                    .map(move |metric| format!("{prefix}.{metric}"))
            })
            .collect()
    }

    fn evaluate(&self, series: &TimeSeries) -> FilterResult {
        let n = series.len();
        let prefixes = self.child_prefixes();

        let mut mask = vec![true; n];
        let mut metrics = BTreeMap::new();
        let mut valid = true;
        let mut reason = None;
        // Once the running mask is all-false no later child can flip a bar
        // back on; skipped children still report their metrics as null.
        let mut exhausted = false;

        for (child, prefix) in self.children.iter().zip(&prefixes) {
            if exhausted {
                for metric in child.metric_names() {
                    metrics.insert(format!("{prefix}.{metric}"), None);
                }
                continue;
            }

            let result = child.evaluate(series);
            if !result.valid && valid {
                valid = false;
                reason = result.reason.clone();
            }
            for (slot, hit) in mask.iter_mut().zip(&result.mask) {
                *slot = *slot && *hit;
            }
            for (metric, value) in result.metrics {
                metrics.insert(format!("{prefix}.{metric}"), value);
            }

            if mask.iter().all(|&m| !m) {
                exhausted = true;
            }
        }

        FilterResult {
            mask,
            metrics,
            valid,
            reason,
        }
    }
}
