use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;

use wgstat_core::collector::{
    FieldValue, Metric, MetricBuffer, OutputFormat, ParseWarning, emit_all,
};

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "wgstat-dump", about = "Inspect captured wg output")]
struct Cli {
    /// File holding `wg show all dump` (or `wg show`) output; stdin if omitted
    path: Option<PathBuf>,

    /// Format of the captured output: dump or legacy
    #[arg(long, default_value = "dump")]
    format: OutputFormat,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    let bytes = match read_input(cli.path.as_deref()) {
        Ok(bytes) => bytes,
        Err(e) => {
            let source = cli
                .path
                .as_ref()
                .map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
            eprintln!("Failed to read {}: {}", source, e);
            std::process::exit(1);
        }
    };

    let report = build_report(cli.format, &bytes);

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", render_text(&report));
    }
}

fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

// ── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Report {
    metrics: Vec<Metric>,
    warnings: Vec<ParseWarning>,
}

fn build_report(format: OutputFormat, bytes: &[u8]) -> Report {
    let mut buffer = MetricBuffer::new();
    emit_all(&mut buffer, format.parse(bytes));
    let (metrics, warnings) = buffer.take();
    Report { metrics, warnings }
}

// ── Formatting helpers ───────────────────────────────────────────────────────

fn fmt_value(value: &FieldValue) -> String {
    match value {
        FieldValue::UInt(v) => v.to_string(),
        FieldValue::Str(s) => format!("{s:?}"),
    }
}

fn render_metric(metric: &Metric) -> String {
    let tags: Vec<String> = metric
        .tags
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    let fields: Vec<String> = metric
        .fields
        .iter()
        .map(|(k, v)| format!("{k}={}", fmt_value(v)))
        .collect();

    if fields.is_empty() {
        format!("{}{{{}}}", metric.name, tags.join(", "))
    } else {
        format!("{}{{{}}} {}", metric.name, tags.join(", "), fields.join(", "))
    }
}

fn render_text(report: &Report) -> String {
    let mut out = String::new();
    for metric in &report.metrics {
        out.push_str(&render_metric(metric));
        out.push('\n');
    }
    if !report.warnings.is_empty() {
        out.push_str(&format!("\n{} warnings:\n", report.warnings.len()));
        for warning in &report.warnings {
            out.push_str(&format!("  {warning}\n"));
        }
    }
    out.push_str(&format!(
        "\n{} metrics, {} warnings\n",
        report.metrics.len(),
        report.warnings.len()
    ));
    out
}
