//! Parser for `wg show all dump` output.
//!
//! Format: one tab-separated line per interface and per peer.
//!
//! ```text
//! interface  private-key  public-key  listen-port  fwmark
//! interface  public-key  preshared-key  endpoint  allowed-ips  latest-handshake  transfer-rx  transfer-tx  persistent-keepalive
//! ```
//!
//! Older `wg` versions print fewer trailing peer columns. Missing counters
//! stay `None` and are left out of the metric, so they never read as a
//! counter reset. A missing keepalive becomes `off`.
//!
//! A peer line belongs to the interface line directly above its block; a peer
//! naming any other interface is dropped as an orphan.

use tracing::trace;

use super::model::{InterfaceRecord, PeerRecord, Record};
use super::warning::ParseWarning;
use super::{OutputParser, ParsedOutput, RawLine, numbered_lines};
use crate::collector::emitter::field;

const INTERFACE_FIELDS: usize = 5;
const PEER_MIN_FIELDS: usize = 6;
const PEER_MAX_FIELDS: usize = 9;

/// Keepalive value `wg` prints when persistent keepalive is disabled.
const KEEPALIVE_OFF: &str = "off";

/// Parser for the tab-separated dump format.
#[derive(Debug, Default, Clone, Copy)]
pub struct DumpParser;

impl OutputParser for DumpParser {
    fn parse(&self, output: &[u8]) -> ParsedOutput {
        let text = String::from_utf8_lossy(output);
        let mut parsed = ParsedOutput::default();
        let mut current_interface: Option<String> = None;

        for (line_no, line) in numbered_lines(&text) {
            let result = match classify_line(line) {
                RawLine::InterfaceHeader(fields) => {
                    let record = parse_interface(&fields);
                    current_interface = Some(record.name.clone());
                    Ok(Record::Interface(record))
                }
                RawLine::PeerHeader(fields)
                    if current_interface.as_deref() != Some(fields[0]) =>
                {
                    Err(ParseWarning::OrphanPeer {
                        line: line_no,
                        public_key: fields[1].to_string(),
                    })
                }
                RawLine::PeerHeader(fields) => parse_peer(line_no, &fields).map(Record::Peer),
                RawLine::ContinuationField { .. } | RawLine::Unrecognized => {
                    Err(ParseWarning::LineFormat {
                        line: line_no,
                        field_count: line.split('\t').count(),
                    })
                }
            };

            if let Err(warning) = &result {
                trace!("dump: {}", warning);
            }
            parsed.push(result);
        }

        parsed
    }
}

/// Classifies a dump line by its column count.
pub fn classify_line(line: &str) -> RawLine<'_> {
    let fields: Vec<&str> = line.split('\t').collect();
    match fields.len() {
        INTERFACE_FIELDS => RawLine::InterfaceHeader(fields),
        PEER_MIN_FIELDS..=PEER_MAX_FIELDS => RawLine::PeerHeader(fields),
        _ => RawLine::Unrecognized,
    }
}

/// Builds an interface record from exactly five columns.
fn parse_interface(fields: &[&str]) -> InterfaceRecord {
    // fields[1] is the private key and is dropped here.
    let fwmark = fields[4].trim();
    InterfaceRecord {
        name: fields[0].to_string(),
        public_key: fields[2].to_string(),
        listen_port: fields[3].to_string(),
        fwmark: (!fwmark.is_empty()).then(|| fwmark.to_string()),
    }
}

/// Builds a peer record from six to nine columns.
///
/// Fails on the first counter column that is present but not a `u64`.
fn parse_peer(line: usize, fields: &[&str]) -> Result<PeerRecord, ParseWarning> {
    let counter = |idx: usize, name: &'static str| -> Result<Option<u64>, ParseWarning> {
        fields
            .get(idx)
            .map(|raw| {
                parse_u64(raw).ok_or_else(|| ParseWarning::FieldCoercion {
                    line,
                    field: name,
                    value: raw.to_string(),
                })
            })
            .transpose()
    };

    // fields[2] is the preshared key and is dropped here.
    Ok(PeerRecord {
        interface: fields[0].to_string(),
        public_key: fields[1].to_string(),
        endpoint: fields[3].to_string(),
        allowed_ips: fields[4].to_string(),
        latest_handshake: counter(5, field::LATEST_HANDSHAKE)?,
        transfer_rx: counter(6, field::TRANSFER_RX)?,
        transfer_tx: counter(7, field::TRANSFER_TX)?,
        persistent_keepalive: fields
            .get(8)
            .map_or_else(|| KEEPALIVE_OFF.to_string(), |s| s.to_string()),
    })
}

/// Strict base-10 `u64`: digits only, no sign, no whitespace.
fn parse_u64(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
