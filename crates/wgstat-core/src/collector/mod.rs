//! WireGuard statistics collector.
//!
//! This module runs the `wg` control utility, parses its output and reports
//! the result as tagged metrics, with support for mocking the command in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   WireguardCollector                        │
//! │                                                             │
//! │  Invocation ──► CommandRunner ──► bytes                     │
//! │                   (trait)           │                       │
//! │                                     ▼                       │
//! │                OutputParser: DumpParser | LegacyParser      │
//! │                                     │                       │
//! │                    records ◄────────┴────────► warnings     │
//! │                       │                           │         │
//! │                    emitter                        │         │
//! │                       ▼                           ▼         │
//! │              Accumulator::add_fields   Accumulator::add_error
//! └─────────────────────────────────────────────────────────────┘
//!              │                      │
//!       ┌──────▼──────┐        ┌──────▼──────┐
//!       │ SystemRunner│        │ MockRunner  │
//!       │ (real wg)   │        │ (Testing)   │
//!       └─────────────┘        └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production
//!
//! ```ignore
//! use wgstat_core::collector::{MetricBuffer, SystemRunner, WireguardCollector};
//! use wgstat_core::WireguardConfig;
//!
//! let collector = WireguardCollector::new(SystemRunner::new(), WireguardConfig::default());
//! let mut acc = MetricBuffer::new();
//! collector.gather(&mut acc).unwrap();
//! ```
//!
//! ## Testing (with MockRunner)
//!
//! ```
//! use wgstat_core::collector::{MetricBuffer, MockRunner, WireguardCollector};
//! use wgstat_core::WireguardConfig;
//!
//! let collector = WireguardCollector::new(MockRunner::two_interfaces(), WireguardConfig::default());
//! let mut acc = MetricBuffer::new();
//! let summary = collector.gather(&mut acc).unwrap();
//! assert_eq!(summary.peers, 2);
//! assert_eq!(acc.metrics.len(), 4);
//! ```

pub mod command;
#[allow(clippy::module_inception)]
mod collector;
pub mod emitter;
pub mod metric;
pub mod mock;
pub mod traits;
pub mod wireguard;

pub use collector::{GatherError, GatherSummary, WireguardCollector};
pub use command::{CommandError, CommandFailure, Invocation};
pub use emitter::{MEASUREMENT, emit, emit_all};
pub use metric::{Accumulator, FieldValue, Fields, Metric, MetricBuffer, Tags};
pub use mock::MockRunner;
pub use traits::{CommandRunner, SystemRunner};
pub use wireguard::{OutputFormat, OutputParser, ParseWarning, ParsedOutput, Record};
