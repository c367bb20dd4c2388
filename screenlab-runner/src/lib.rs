//! ScreenLab Runner — screening orchestration on top of `screenlab-core`.
//!
//! This crate builds on the filter engine to provide:
//! - Parallel screening with partial-failure semantics
//! - Cross-symbol metric aggregation over the qualifying set
//! - Serializable screen configuration with content-addressed run ids
//! - CSV bar ingestion for the configured universe

pub mod aggregate;
pub mod config;
pub mod data_loader;
pub mod engine;
pub mod result;

pub use aggregate::{aggregate_metrics, Aggregation, MetricAggregation};
pub use config::{ConfigError, RunId, ScreenConfig};
pub use data_loader::{load_universe, LoadError};
pub use engine::{DateRange, EngineConfig, EngineError, ScreenerEngine};
pub use result::{ScreenResult, ScreenerSummary};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn engine_is_send_sync() {
        assert_send::<ScreenerEngine>();
        assert_sync::<ScreenerEngine>();
    }

    #[test]
    fn result_types_are_send_sync() {
        assert_send::<ScreenResult>();
        assert_sync::<ScreenResult>();
        assert_send::<ScreenerSummary>();
        assert_sync::<ScreenerSummary>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<ScreenConfig>();
        assert_sync::<ScreenConfig>();
        assert_send::<EngineConfig>();
        assert_sync::<EngineConfig>();
        assert_send::<MetricAggregation>();
        assert_sync::<MetricAggregation>();
    }
}
