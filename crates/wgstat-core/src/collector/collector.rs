//! Gather routine combining the invoker, the parsers and the emitter.
//!
//! `WireguardCollector` provides the single entry point a host scheduler
//! calls on every interval.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::collector::command::{CommandError, Invocation};
use crate::collector::emitter::emit_all;
use crate::collector::metric::Accumulator;
use crate::collector::traits::CommandRunner;
use crate::collector::wireguard::ParsedOutput;
use crate::config::WireguardConfig;

/// Counts from one successful gather cycle.
///
/// Used for logging and monitoring by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatherSummary {
    /// Interface metrics emitted.
    pub interfaces: usize,
    /// Peer metrics emitted.
    pub peers: usize,
    /// Lines dropped and reported through `add_error`.
    pub warnings: usize,
    /// Wall time of the cycle, including the `wg` run.
    pub elapsed: Duration,
}

/// Failure of a whole gather cycle.
#[derive(Debug)]
pub enum GatherError {
    /// `wg` could not be run, failed, or timed out.
    Invocation(CommandError),
}

impl std::fmt::Display for GatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatherError::Invocation(e) => write!(f, "error gathering metrics: {}", e),
        }
    }
}

impl std::error::Error for GatherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatherError::Invocation(e) => Some(e),
        }
    }
}

impl From<CommandError> for GatherError {
    fn from(e: CommandError) -> Self {
        GatherError::Invocation(e)
    }
}

/// Collects WireGuard statistics into an [`Accumulator`].
///
/// Holds no state between cycles; every call runs `wg` once and reports
/// everything it parsed.
pub struct WireguardCollector<R: CommandRunner> {
    runner: R,
    config: WireguardConfig,
}

impl<R: CommandRunner> WireguardCollector<R> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `runner` - Command runner implementation (real or mock)
    /// * `config` - Collector settings; expected to be validated by the host
    pub fn new(runner: R, config: WireguardConfig) -> Self {
        Self { runner, config }
    }

    pub fn config(&self) -> &WireguardConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs one gather cycle.
    ///
    /// Per-line problems go to [`Accumulator::add_error`] and do not stop the
    /// cycle. A failed `wg` run returns [`GatherError::Invocation`]; when
    /// `parse_partial_output` is set, whatever output it produced is parsed
    /// and emitted first.
    pub fn gather(&self, acc: &mut dyn Accumulator) -> Result<GatherSummary, GatherError> {
        let started = Instant::now();
        let invocation = Invocation::from_config(&self.config);

        let output = match self.runner.run(&invocation) {
            Ok(output) => output,
            Err(err) => {
                if self.config.parse_partial_output && !err.output.is_empty() {
                    warn!(
                        "wg failed, parsing {} bytes of partial output",
                        err.output.len()
                    );
                    let parsed = self.config.format.parse(&err.output);
                    report(acc, parsed, started);
                }
                return Err(err.into());
            }
        };

        let parsed = self.config.format.parse(&output);
        let summary = report(acc, parsed, started);
        debug!(
            "gathered {} interfaces, {} peers, {} warnings in {:?}",
            summary.interfaces, summary.peers, summary.warnings, summary.elapsed
        );
        Ok(summary)
    }
}

fn report(acc: &mut dyn Accumulator, parsed: ParsedOutput, started: Instant) -> GatherSummary {
    let interfaces = parsed.interface_count();
    let peers = parsed.peer_count();
    let warnings = parsed.warnings.len();

    emit_all(acc, parsed);

    GatherSummary {
        interfaces,
        peers,
        warnings,
        elapsed: started.elapsed(),
    }
}
