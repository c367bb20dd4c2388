//! ScreenLab Core — domain types, rolling-window kernels, screen filters.
//!
//! This crate contains the filter evaluation engine:
//! - Domain types (bars, per-symbol time series)
//! - O(N) rolling-window kernels (trailing mean, percent change)
//! - The `ScreenFilter` trait and its implementations
//!   (volume, price change, moving average, composite)
//! - A config-spec factory producing shared filter trait objects
//!
//! Everything here is pure computation: no I/O, no parallelism, no
//! retained state. The runner crate owns fan-out and aggregation.

pub mod domain;
pub mod filters;
pub mod rolling;
