//! Serializable screen configuration.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use screenlab_core::filters::FilterSpec;

use crate::aggregate::MetricAggregation;
use crate::engine::DateRange;

/// Unique identifier for a screening run (content-addressable hash).
pub type RunId = String;

/// Errors from loading or validating a screen configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("universe must not be empty")]
    EmptyUniverse,
    #[error("duplicate symbol in universe: {0}")]
    DuplicateSymbol(String),
    #[error("at least one filter is required")]
    NoFilters,
    #[error("start date {start} is after end date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
    #[error("workers must be >= 1")]
    InvalidWorkerCount,
}

/// Serializable configuration for a single screening run.
///
/// This struct captures all parameters needed to reproduce a screen:
/// universe, date range, filter stack, aggregations, and worker count.
/// There is no built-in default watchlist — the config is the single
/// source of the universe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenConfig {
    /// Symbols to screen.
    pub universe: Vec<String>,

    /// Qualification window start (inclusive). Open when absent.
    pub start_date: Option<NaiveDate>,

    /// Qualification window end (inclusive). Open when absent.
    pub end_date: Option<NaiveDate>,

    /// Worker pool size; defaults to available cores when absent.
    pub workers: Option<usize>,

    /// Filter stack, AND-combined in order.
    pub filters: Vec<FilterSpec>,

    /// Cross-symbol aggregations to compute over the qualifying set.
    #[serde(default)]
    pub aggregations: Vec<MetricAggregation>,
}

impl ScreenConfig {
    /// Load and parse a TOML config file. Validation is separate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.is_empty() {
            return Err(ConfigError::EmptyUniverse);
        }
        let mut seen = HashSet::new();
        for symbol in &self.universe {
            if !seen.insert(symbol.as_str()) {
                return Err(ConfigError::DuplicateSymbol(symbol.clone()));
            }
        }
        if self.filters.is_empty() {
            return Err(ConfigError::NoFilters);
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ConfigError::InvertedDateRange { start, end });
            }
        }
        if self.workers == Some(0) {
            return Err(ConfigError::InvalidWorkerCount);
        }
        Ok(())
    }

    /// The qualification window, or `None` when both bounds are open.
    pub fn date_range(&self) -> Option<DateRange> {
        if self.start_date.is_none() && self.end_date.is_none() {
            return None;
        }
        Some(DateRange {
            start: self.start_date,
            end: self.end_date,
        })
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share a RunId, so downstream
    /// layers can dedupe or cache results.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("ScreenConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        format!("{}", hash.to_hex())
    }
}
