//! wgstatd - WireGuard statistics collector daemon.
//!
//! Runs `wg` on a fixed interval and writes the resulting metrics to stdout
//! as JSON lines. Logs go to stderr.

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod sink;

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use wgstat_core::collector::{OutputFormat, SystemRunner, WireguardCollector};
use wgstat_core::config::{DEFAULT_BINARY, WireguardConfig};
use wgstat_core::util::parse_duration;

use crate::sink::JsonLinesSink;

/// WireGuard statistics collector daemon.
#[derive(Parser)]
#[command(name = "wgstatd", about = "WireGuard statistics collector daemon", version)]
struct Args {
    /// Collection interval (e.g. "10s", "1m", "500ms").
    #[arg(short, long, default_value = "10s", value_parser = parse_duration)]
    interval: Duration,

    /// Path to the wg binary.
    #[arg(short, long, default_value = DEFAULT_BINARY)]
    binary: String,

    /// Upper bound for a single wg run.
    #[arg(short, long, default_value = "1s", value_parser = parse_duration)]
    timeout: Duration,

    /// Run wg through sudo.
    #[arg(long)]
    use_sudo: bool,

    /// wg output format to request: "dump" (wg show all dump) or "legacy" (wg show).
    #[arg(long, default_value = "dump")]
    format: OutputFormat,

    /// Parse partial output of a failed or timed out wg run.
    #[arg(long)]
    parse_partial_output: bool,

    /// Run a single collection cycle and exit.
    #[arg(long)]
    once: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn collector_config(&self) -> WireguardConfig {
        WireguardConfig {
            binary: self.binary.clone(),
            timeout: self.timeout,
            use_sudo: self.use_sudo,
            format: self.format,
            parse_partial_output: self.parse_partial_output,
        }
    }
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["wgstatd", "wgstat_core"] {
        match format!("{}={}", target, level).parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("Invalid log directive for {}: {}", target, e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Runs one cycle and writes its metrics to stdout.
///
/// Returns `false` if the cycle failed.
fn collect_once(collector: &WireguardCollector<SystemRunner>, cycle: u64) -> bool {
    let stdout = io::stdout();
    let mut sink = JsonLinesSink::new(stdout.lock(), Utc::now());

    let ok = match collector.gather(&mut sink) {
        Ok(summary) => {
            info!(
                "Cycle #{}: {} interfaces, {} peers, {} warnings ({:?})",
                cycle, summary.interfaces, summary.peers, summary.warnings, summary.elapsed
            );
            true
        }
        Err(e) => {
            error!("Cycle #{}: {}", cycle, e);
            false
        }
    };

    sink.flush();
    debug!("Cycle #{}: {} metrics written", cycle, sink.written());
    ok
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let config = args.collector_config();
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!(
        "wgstatd {} ({}) starting",
        env!("CARGO_PKG_VERSION"),
        wgstat_core::BUILD_SHA
    );
    let collector = WireguardCollector::new(SystemRunner::new(), config);
    let config = collector.config();
    info!(
        "Config: interval={:?}, binary={}, timeout={:?}, sudo={}, format={:?}",
        args.interval, config.binary, config.timeout, config.use_sudo, config.format
    );

    if args.once {
        let ok = collect_once(&collector, 1);
        std::process::exit(if ok { 0 } else { 1 });
    }

    // Setup graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    info!("Starting collection loop");

    let mut cycle: u64 = 0;
    let mut failures: u64 = 0;

    while running.load(Ordering::SeqCst) {
        cycle += 1;
        if !collect_once(&collector, cycle) {
            failures += 1;
        }

        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = args.interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!(
        "Shutdown complete after {} cycles ({} failed)",
        cycle, failures
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_defaults_match_collector_defaults() {
        let args = Args::parse_from(["wgstatd"]);
        assert_eq!(args.interval, Duration::from_secs(10));
        assert_eq!(args.collector_config(), WireguardConfig::default());
    }

    #[test]
    fn args_map_to_collector_config() {
        let args = Args::parse_from([
            "wgstatd",
            "--binary",
            "/usr/local/bin/wg",
            "--timeout",
            "250ms",
            "--use-sudo",
            "--format",
            "legacy",
            "--parse-partial-output",
        ]);
        let config = args.collector_config();
        assert_eq!(config.binary, "/usr/local/bin/wg");
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert!(config.use_sudo);
        assert_eq!(config.format, OutputFormat::Legacy);
        assert!(config.parse_partial_output);
    }

    #[test]
    fn args_reject_bad_duration() {
        assert!(Args::try_parse_from(["wgstatd", "--interval", "often"]).is_err());
    }
}
