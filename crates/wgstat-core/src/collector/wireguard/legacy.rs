//! Parser for the human-readable `wg show` output.
//!
//! Kept for compatibility with hosts that still run plain `wg show`. Values
//! are stored as printed; nothing is converted to numbers.
//!
//! ```text
//! interface: home
//!   public key: p3p3Uzj50FS7sdrTEviJwlsFaUu1TUdBsp+VZUdzm1I=
//!   private key: (hidden)
//!   listening port: 12345
//!   fwmark: 0xca6c
//!
//! peer: JO2If0/wZ8ajoiUSU501u6uNtDZYSIYiz/xtazIMDi0=
//!   endpoint: 198.51.100.1:54321
//!   allowed ips: 192.168.2.0/24, 192.168.1.0/24
//!   latest handshake: 21 seconds ago
//!   transfer: 74.90 KiB received, 98.13 KiB sent
//! ```

use std::iter::Peekable;

use tracing::trace;

use super::model::{InterfaceRecord, LegacyPeerRecord, Record};
use super::warning::ParseWarning;
use super::{OutputParser, ParsedOutput, RawLine, numbered_lines};

/// Maximum number of lines a header pulls into its block.
const BLOCK_LINES: usize = 4;

/// Parser for the `key: value` block format.
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyParser;

impl OutputParser for LegacyParser {
    fn parse(&self, output: &[u8]) -> ParsedOutput {
        let text = String::from_utf8_lossy(output);
        let mut parsed = ParsedOutput::default();
        let mut lines = numbered_lines(&text).peekable();
        let mut current_interface: Option<String> = None;

        while let Some((line_no, line)) = lines.next() {
            match classify_line(line) {
                RawLine::InterfaceHeader(values) => {
                    let mut record = InterfaceRecord {
                        name: values[0].to_string(),
                        ..Default::default()
                    };
                    for (key, value) in block_fields(&mut lines) {
                        if key.starts_with("public key") {
                            record.public_key = value.to_string();
                        } else if key.starts_with("listening port") {
                            record.listen_port = value.to_string();
                        } else if key.starts_with("fwmark") {
                            record.fwmark = Some(value.to_string());
                        }
                        // "private key" and anything unknown are dropped.
                    }
                    current_interface = Some(record.name.clone());
                    parsed.push(Ok(Record::Interface(record)));
                }
                RawLine::PeerHeader(values) => {
                    let public_key = values[0].to_string();
                    let fields = block_fields(&mut lines);

                    let Some(interface) = &current_interface else {
                        parsed.push(Err(ParseWarning::OrphanPeer {
                            line: line_no,
                            public_key,
                        }));
                        continue;
                    };

                    let mut record = LegacyPeerRecord {
                        interface: interface.clone(),
                        public_key,
                        ..Default::default()
                    };
                    for (key, value) in fields {
                        let value = Some(value.to_string());
                        if key.starts_with("endpoint") {
                            record.endpoint = value;
                        } else if key.starts_with("allowed ips") {
                            record.allowed_ips = value;
                        } else if key.starts_with("latest handshake") {
                            record.latest_handshake = value;
                        } else if key.starts_with("transfer") {
                            record.transfer = value;
                        }
                    }
                    parsed.push(Ok(Record::LegacyPeer(record)));
                }
                RawLine::ContinuationField { key, .. } => {
                    trace!("legacy: line {}: field {:?} outside a block, skipped", line_no, key);
                }
                RawLine::Unrecognized => {
                    trace!("legacy: line {}: unrecognized, skipped", line_no);
                }
            }
        }

        parsed
    }
}

/// Classifies a line by splitting it on the first colon.
pub fn classify_line(line: &str) -> RawLine<'_> {
    let Some((key, value)) = line.split_once(':') else {
        return RawLine::Unrecognized;
    };
    let key = key.trim();
    let value = value.trim();

    if key.starts_with("interface") {
        RawLine::InterfaceHeader(vec![value])
    } else if key.starts_with("peer") {
        RawLine::PeerHeader(vec![value])
    } else {
        RawLine::ContinuationField { key, value }
    }
}

/// Consumes up to [`BLOCK_LINES`] lines following a header.
///
/// Stops early, without consuming it, at a line that starts a new block.
/// Lines without a colon count towards the limit but yield nothing.
fn block_fields<'a, I>(lines: &mut Peekable<I>) -> Vec<(&'a str, &'a str)>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut fields = Vec::with_capacity(BLOCK_LINES);
    for _ in 0..BLOCK_LINES {
        let Some(&(_, line)) = lines.peek() else {
            break;
        };
        match classify_line(line) {
            RawLine::InterfaceHeader(_) | RawLine::PeerHeader(_) => break,
            RawLine::ContinuationField { key, value } => fields.push((key, value)),
            RawLine::Unrecognized => {}
        }
        lines.next();
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::scenarios::LEGACY_TWO_INTERFACES;

    fn parse(text: &str) -> ParsedOutput {
        LegacyParser.parse(text.as_bytes())
    }

    #[test]
    fn test_parse_fixture() {
        let parsed = parse(LEGACY_TWO_INTERFACES);
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.interface_count(), 2);
        assert_eq!(parsed.peer_count(), 2);

        assert_eq!(
            parsed.records[0],
            Record::Interface(InterfaceRecord {
                name: "home".to_string(),
                public_key: "p3p3Uzj50FS7sdrTEviJwlsFaUu1TUdBsp+VZUdzm1I=".to_string(),
                listen_port: "12345".to_string(),
                fwmark: Some("0xca6c".to_string()),
            })
        );
        assert_eq!(
            parsed.records[3],
            Record::LegacyPeer(LegacyPeerRecord {
                interface: "remote".to_string(),
                public_key: "WMwr/+0L4HJS4rsyM5oUlOUP+jTyp2HIuYPWfUNjC0c=".to_string(),
                endpoint: Some("203.0.113.100:443".to_string()),
                allowed_ips: Some("0.0.0.0/0, ::/0".to_string()),
                latest_handshake: Some("1 minute, 54 seconds ago".to_string()),
                transfer: Some("22.85 KiB received, 48.58 KiB sent".to_string()),
            })
        );
    }

    #[test]
    fn test_private_key_is_dropped() {
        let parsed = parse("interface: wg0\n  private key: c2VjcmV0\n");
        assert!(!format!("{:?}", parsed).contains("c2VjcmV0"));
    }

    #[test]
    fn test_reordered_and_unknown_lines() {
        let text = "\
interface: wg0
  fwmark: off
  garbage without colon
  listening port: 51820
  public key: pub0
";
        let parsed = parse(text);
        assert_eq!(
            parsed.records,
            vec![Record::Interface(InterfaceRecord {
                name: "wg0".to_string(),
                public_key: "pub0".to_string(),
                listen_port: "51820".to_string(),
                fwmark: Some("off".to_string()),
            })]
        );
    }

    #[test]
    fn test_short_block_does_not_swallow_next_header() {
        let text = "\
interface: wg0
  public key: pub0
  listening port: 51820
peer: peerA
  endpoint: 10.0.0.1:51820
";
        let parsed = parse(text);
        assert_eq!(parsed.interface_count(), 1);
        assert_eq!(parsed.peer_count(), 1);
        let Record::LegacyPeer(peer) = &parsed.records[1] else {
            panic!("expected legacy peer");
        };
        assert_eq!(peer.interface, "wg0");
        assert_eq!(peer.endpoint.as_deref(), Some("10.0.0.1:51820"));
        assert_eq!(peer.transfer, None);
    }

    #[test]
    fn test_extra_peer_lines_are_ignored() {
        let text = "\
interface: wg0
  public key: pub0
peer: peerA
  preshared key: (hidden)
  endpoint: 10.0.0.1:51820
  allowed ips: 10.1.0.0/16
  latest handshake: 3 seconds ago
  transfer: 1.00 KiB received, 2.00 KiB sent
  persistent keepalive: every 25 seconds
";
        let parsed = parse(text);
        assert!(parsed.warnings.is_empty());
        let Record::LegacyPeer(peer) = &parsed.records[1] else {
            panic!("expected legacy peer");
        };
        // Only four lines belong to the block; the transfer line is the fifth.
        assert_eq!(peer.latest_handshake.as_deref(), Some("3 seconds ago"));
        assert_eq!(peer.transfer, None);
    }

    #[test]
    fn test_peer_without_interface_is_orphan() {
        let parsed = parse("peer: peerA\n  endpoint: 10.0.0.1:51820\n");
        assert!(parsed.records.is_empty());
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::OrphanPeer {
                line: 1,
                public_key: "peerA".to_string(),
            }]
        );
    }

    #[test]
    fn test_classify_line() {
        assert_eq!(classify_line("interface: wg0"), RawLine::InterfaceHeader(vec!["wg0"]));
        assert_eq!(classify_line("peer: abc="), RawLine::PeerHeader(vec!["abc="]));
        assert_eq!(
            classify_line("  endpoint: [fd00::1]:51820"),
            RawLine::ContinuationField {
                key: "endpoint",
                value: "[fd00::1]:51820"
            }
        );
        assert_eq!(classify_line("no colon here"), RawLine::Unrecognized);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let bytes = LEGACY_TWO_INTERFACES.as_bytes();
        assert_eq!(LegacyParser.parse(bytes), LegacyParser.parse(bytes));
    }
}
