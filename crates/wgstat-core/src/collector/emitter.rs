//! Turns parsed records into `wireguard` metrics.
//!
//! Interfaces and peers share one measurement; they differ in which tags and
//! fields are populated.

use crate::collector::metric::{Accumulator, FieldValue, Fields, Tags};
use crate::collector::wireguard::{
    InterfaceRecord, LegacyPeerRecord, ParsedOutput, PeerRecord, Record,
};

/// Measurement name for every metric this collector emits.
pub const MEASUREMENT: &str = "wireguard";

/// Tag keys.
pub mod tag {
    pub const INTERFACE: &str = "interface";
    pub const PUBLIC_KEY: &str = "publicKey";
    pub const LISTEN_PORT: &str = "listenPort";
    pub const FWMARK: &str = "fwmark";
    pub const ENDPOINT: &str = "endpoint";
    pub const ALLOWED_IPS: &str = "allowedIPs";
    pub const PERSISTENT_KEEPALIVE: &str = "persistentKeepalive";
}

/// Field keys.
pub mod field {
    pub const LATEST_HANDSHAKE: &str = "latestHandshake";
    pub const TRANSFER_RX: &str = "transferRx";
    pub const TRANSFER_TX: &str = "transferTx";
    /// Legacy format only.
    pub const TRANSFER: &str = "transfer";
}

/// Hands one record to the sink as exactly one metric.
pub fn emit(acc: &mut dyn Accumulator, record: &Record) {
    let (fields, tags) = match record {
        Record::Interface(r) => interface_metric(r),
        Record::Peer(r) => peer_metric(r),
        Record::LegacyPeer(r) => legacy_peer_metric(r),
    };
    acc.add_fields(MEASUREMENT, fields, tags);
}

/// Emits every record of `parsed`, then forwards its warnings in order.
pub fn emit_all(acc: &mut dyn Accumulator, parsed: ParsedOutput) {
    for record in &parsed.records {
        emit(acc, record);
    }
    for warning in parsed.warnings {
        acc.add_error(warning);
    }
}

fn interface_metric(r: &InterfaceRecord) -> (Fields, Tags) {
    let mut tags = Tags::new();
    tags.insert(tag::INTERFACE.into(), r.name.clone());
    tags.insert(tag::PUBLIC_KEY.into(), r.public_key.clone());
    tags.insert(tag::LISTEN_PORT.into(), r.listen_port.clone());
    if let Some(fwmark) = &r.fwmark {
        tags.insert(tag::FWMARK.into(), fwmark.clone());
    }
    (Fields::new(), tags)
}

fn peer_metric(r: &PeerRecord) -> (Fields, Tags) {
    let mut tags = Tags::new();
    tags.insert(tag::INTERFACE.into(), r.interface.clone());
    tags.insert(tag::PUBLIC_KEY.into(), r.public_key.clone());
    tags.insert(tag::ENDPOINT.into(), r.endpoint.clone());
    tags.insert(tag::ALLOWED_IPS.into(), r.allowed_ips.clone());
    tags.insert(tag::PERSISTENT_KEEPALIVE.into(), r.persistent_keepalive.clone());

    let counters = [
        (field::LATEST_HANDSHAKE, r.latest_handshake),
        (field::TRANSFER_RX, r.transfer_rx),
        (field::TRANSFER_TX, r.transfer_tx),
    ];
    let fields = counters
        .into_iter()
        .filter_map(|(key, value)| Some((key.to_string(), FieldValue::UInt(value?))))
        .collect();
    (fields, tags)
}

fn legacy_peer_metric(r: &LegacyPeerRecord) -> (Fields, Tags) {
    let mut tags = Tags::new();
    tags.insert(tag::INTERFACE.into(), r.interface.clone());
    tags.insert(tag::PUBLIC_KEY.into(), r.public_key.clone());
    if let Some(endpoint) = &r.endpoint {
        tags.insert(tag::ENDPOINT.into(), endpoint.clone());
    }
    if let Some(allowed_ips) = &r.allowed_ips {
        tags.insert(tag::ALLOWED_IPS.into(), allowed_ips.clone());
    }

    let mut fields = Fields::new();
    if let Some(handshake) = &r.latest_handshake {
        fields.insert(field::LATEST_HANDSHAKE.into(), FieldValue::Str(handshake.clone()));
    }
    if let Some(transfer) = &r.transfer {
        fields.insert(field::TRANSFER.into(), FieldValue::Str(transfer.clone()));
    }
    (fields, tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::metric::MetricBuffer;

    #[test]
    fn test_interface_metric() {
        let mut buffer = MetricBuffer::new();
        emit(
            &mut buffer,
            &Record::Interface(InterfaceRecord {
                name: "wg0".into(),
                public_key: "pub0".into(),
                listen_port: "51820".into(),
                fwmark: None,
            }),
        );

        assert_eq!(buffer.metrics.len(), 1);
        let m = &buffer.metrics[0];
        assert_eq!(m.name, "wireguard");
        assert!(m.fields.is_empty());
        assert_eq!(m.tags.len(), 3);
        assert_eq!(m.tag("interface"), Some("wg0"));
        assert_eq!(m.tag("publicKey"), Some("pub0"));
        assert_eq!(m.tag("listenPort"), Some("51820"));
        assert_eq!(m.tag("fwmark"), None);
    }

    #[test]
    fn test_interface_metric_keeps_fwmark() {
        let mut buffer = MetricBuffer::new();
        emit(
            &mut buffer,
            &Record::Interface(InterfaceRecord {
                fwmark: Some("0xca6c".into()),
                ..Default::default()
            }),
        );
        assert_eq!(buffer.metrics[0].tag("fwmark"), Some("0xca6c"));
    }

    #[test]
    fn test_peer_metric() {
        let mut buffer = MetricBuffer::new();
        emit(
            &mut buffer,
            &Record::Peer(PeerRecord {
                interface: "wg0".into(),
                public_key: "peerA".into(),
                endpoint: "(none)".into(),
                allowed_ips: "10.1.0.0/16, fd00::/64".into(),
                latest_handshake: Some(1700000000),
                transfer_rx: Some(1024),
                transfer_tx: Some(2048),
                persistent_keepalive: "off".into(),
            }),
        );

        let m = &buffer.metrics[0];
        assert_eq!(m.tag("endpoint"), Some("(none)"));
        assert_eq!(m.tag("allowedIPs"), Some("10.1.0.0/16, fd00::/64"));
        assert_eq!(m.tag("persistentKeepalive"), Some("off"));
        assert_eq!(m.fields.len(), 3);
        assert_eq!(m.field("latestHandshake"), Some(&FieldValue::UInt(1700000000)));
        assert_eq!(m.field("transferRx"), Some(&FieldValue::UInt(1024)));
        assert_eq!(m.field("transferTx"), Some(&FieldValue::UInt(2048)));
    }

    #[test]
    fn test_peer_metric_omits_missing_counters() {
        let mut buffer = MetricBuffer::new();
        emit(
            &mut buffer,
            &Record::Peer(PeerRecord {
                interface: "wg0".into(),
                public_key: "peerA".into(),
                endpoint: "(none)".into(),
                allowed_ips: "10.1.0.0/16".into(),
                latest_handshake: Some(1700000000),
                transfer_rx: None,
                transfer_tx: None,
                persistent_keepalive: "off".into(),
            }),
        );

        let m = &buffer.metrics[0];
        assert_eq!(m.fields.len(), 1);
        assert_eq!(m.field("latestHandshake"), Some(&FieldValue::UInt(1700000000)));
        assert_eq!(m.field("transferRx"), None);
        assert_eq!(m.field("transferTx"), None);
    }

    #[test]
    fn test_legacy_peer_metric_skips_absent_values() {
        let mut buffer = MetricBuffer::new();
        emit(
            &mut buffer,
            &Record::LegacyPeer(LegacyPeerRecord {
                interface: "wg0".into(),
                public_key: "peerA".into(),
                latest_handshake: Some("21 seconds ago".into()),
                ..Default::default()
            }),
        );

        let m = &buffer.metrics[0];
        assert_eq!(m.tags.len(), 2);
        assert_eq!(
            m.field("latestHandshake").and_then(FieldValue::as_str),
            Some("21 seconds ago")
        );
        assert_eq!(m.field("transfer"), None);
    }
}
