//! wgstat-core — shared library for the wgstat tools.
//!
//! Provides:
//! - `collector` — `wg` invocation, output parsers, metric emission, gather routine
//! - `config` — collector configuration and validation
//! - `util` — helper utilities

pub mod collector;
pub mod config;
pub mod util;

pub use collector::{Accumulator, GatherError, GatherSummary, MetricBuffer, WireguardCollector};
pub use config::WireguardConfig;

/// Short git SHA of the build, or `unknown` outside a git checkout.
pub const BUILD_SHA: &str = env!("WGSTAT_GIT_SHA");
