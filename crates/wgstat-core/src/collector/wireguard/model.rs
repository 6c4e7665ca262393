//! Records parsed from `wg` output.
//!
//! Records live for a single gather cycle. Private and preshared keys are
//! never stored.

use serde::Serialize;

/// One local WireGuard interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceRecord {
    pub name: String,
    pub public_key: String,
    /// Opaque; `wg` prints the port number as-is.
    pub listen_port: String,
    /// Opaque; `None` when the column or line was absent.
    pub fwmark: Option<String>,
}

/// One peer from the dump format, with coerced counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeerRecord {
    /// Name of the interface the peer belongs to.
    pub interface: String,
    pub public_key: String,
    /// `host:port`, or `(none)` when the peer has no endpoint.
    pub endpoint: String,
    /// Comma-joined list as printed by `wg`.
    pub allowed_ips: String,
    /// Seconds since epoch of the latest handshake, `0` if none.
    /// `None` when the column is missing.
    pub latest_handshake: Option<u64>,
    /// Bytes received.
    pub transfer_rx: Option<u64>,
    /// Bytes sent.
    pub transfer_tx: Option<u64>,
    /// Interval in seconds, or `off`.
    pub persistent_keepalive: String,
}

/// One peer from the legacy format. Values are kept as printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegacyPeerRecord {
    pub interface: String,
    pub public_key: String,
    pub endpoint: Option<String>,
    pub allowed_ips: Option<String>,
    /// e.g. `1 minute, 54 seconds ago`.
    pub latest_handshake: Option<String>,
    /// e.g. `22.85 KiB received, 48.58 KiB sent`.
    pub transfer: Option<String>,
}

/// A record produced by either parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Interface(InterfaceRecord),
    Peer(PeerRecord),
    LegacyPeer(LegacyPeerRecord),
}

