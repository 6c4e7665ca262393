//! Parsers for `wg` output.
//!
//! Two independent strategies produce the same [`ParsedOutput`]:
//!
//! - [`DumpParser`] — `wg show all dump`, tab-separated fixed columns (canonical)
//! - [`LegacyParser`] — `wg show`, indented `key: value` blocks
//!
//! Both are pure functions of the input bytes. Malformed lines never abort a
//! parse; they are dropped and reported as [`ParseWarning`]s.

pub mod dump;
pub mod legacy;
pub mod model;
pub mod warning;

use serde::{Deserialize, Serialize};

pub use dump::DumpParser;
pub use legacy::LegacyParser;
pub use model::{InterfaceRecord, LegacyPeerRecord, PeerRecord, Record};
pub use warning::ParseWarning;

/// Output format requested from `wg`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `wg show all dump`.
    #[default]
    Dump,
    /// `wg show`.
    Legacy,
}

impl OutputFormat {
    /// `wg` arguments that produce this format.
    pub fn command_args(self) -> &'static [&'static str] {
        match self {
            OutputFormat::Dump => &["show", "all", "dump"],
            OutputFormat::Legacy => &["show"],
        }
    }

    /// Parses `output` with the parser for this format.
    pub fn parse(self, output: &[u8]) -> ParsedOutput {
        match self {
            OutputFormat::Dump => DumpParser.parse(output),
            OutputFormat::Legacy => LegacyParser.parse(output),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dump" => Ok(OutputFormat::Dump),
            "legacy" => Ok(OutputFormat::Legacy),
            other => Err(format!("unknown output format '{}' (expected dump or legacy)", other)),
        }
    }
}

/// A parser strategy turning captured `wg` output into records.
pub trait OutputParser {
    fn parse(&self, output: &[u8]) -> ParsedOutput;
}

/// Records accepted from one output buffer, plus the lines that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedOutput {
    /// Accepted records, in output order.
    pub records: Vec<Record>,
    /// One entry per dropped line, in output order.
    pub warnings: Vec<ParseWarning>,
}

impl ParsedOutput {
    /// Appends the outcome of parsing one line.
    pub fn push(&mut self, line: Result<Record, ParseWarning>) {
        match line {
            Ok(record) => self.records.push(record),
            Err(warning) => self.warnings.push(warning),
        }
    }

    pub fn interface_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, Record::Interface(_)))
            .count()
    }

    pub fn peer_count(&self) -> usize {
        self.records.len() - self.interface_count()
    }
}

/// Classification of a single line of `wg` output.
#[derive(Debug, Clone, PartialEq)]
pub enum RawLine<'a> {
    /// Starts an interface (dump: 5 columns; legacy: `interface: <name>`).
    InterfaceHeader(Vec<&'a str>),
    /// Starts a peer (dump: 6–9 columns; legacy: `peer: <key>`).
    PeerHeader(Vec<&'a str>),
    /// Legacy `key: value` line belonging to the current block.
    ContinuationField { key: &'a str, value: &'a str },
    /// Anything else.
    Unrecognized,
}

/// Iterates over non-empty lines with their 1-based line numbers.
///
/// Line numbers count every line, including empty ones, so they match the
/// position in the original output.
pub(crate) fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("dump".parse::<OutputFormat>(), Ok(OutputFormat::Dump));
        assert_eq!("Legacy".parse::<OutputFormat>(), Ok(OutputFormat::Legacy));
        assert!("json".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_numbered_lines_skips_blank_but_keeps_numbering() {
        let lines: Vec<_> = numbered_lines("a\n\n  \nb\r\n").collect();
        assert_eq!(lines, vec![(1, "a"), (4, "b")]);
    }
}
