//! Metric shape and the accumulator sink the collector reports into.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::collector::wireguard::ParseWarning;

/// Tag set of a metric, ordered by key.
pub type Tags = BTreeMap<String, String>;

/// Field set of a metric, ordered by key.
pub type Fields = BTreeMap<String, FieldValue>;

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    UInt(u64),
    Str(String),
}

impl FieldValue {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::UInt(v) => Some(*v),
            FieldValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            FieldValue::UInt(_) => None,
        }
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::UInt(v)
    }
}

/// One observation handed to the sink.
///
/// Carries no timestamp; the host stamps metrics when it records them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub name: String,
    pub tags: Tags,
    pub fields: Fields,
}

impl Metric {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

/// Sink receiving metrics and non-fatal problems from a gather cycle.
pub trait Accumulator {
    /// Records one metric.
    fn add_fields(&mut self, measurement: &str, fields: Fields, tags: Tags);

    /// Reports a dropped record. Processing continues after this call.
    fn add_error(&mut self, warning: ParseWarning);
}

/// In-memory accumulator collecting everything it is given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricBuffer {
    pub metrics: Vec<Metric>,
    pub warnings: Vec<ParseWarning>,
}

impl MetricBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the collected metrics and warnings.
    pub fn take(&mut self) -> (Vec<Metric>, Vec<ParseWarning>) {
        (
            std::mem::take(&mut self.metrics),
            std::mem::take(&mut self.warnings),
        )
    }
}

impl Accumulator for MetricBuffer {
    fn add_fields(&mut self, measurement: &str, fields: Fields, tags: Tags) {
        self.metrics.push(Metric {
            name: measurement.to_string(),
            tags,
            fields,
        });
    }

    fn add_error(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_collects_and_takes() {
        let mut buffer = MetricBuffer::new();
        let mut fields = Fields::new();
        fields.insert("transferRx".to_string(), 42u64.into());
        let mut tags = Tags::new();
        tags.insert("interface".to_string(), "wg0".to_string());

        buffer.add_fields("wireguard", fields, tags);
        buffer.add_error(ParseWarning::LineFormat {
            line: 3,
            field_count: 2,
        });

        let (metrics, warnings) = buffer.take();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].tag("interface"), Some("wg0"));
        assert_eq!(metrics[0].field("transferRx").and_then(FieldValue::as_u64), Some(42));
        assert_eq!(warnings.len(), 1);
        assert!(buffer.metrics.is_empty());
        assert!(buffer.warnings.is_empty());
    }

    #[test]
    fn test_field_value_serializes_untagged() {
        let json = serde_json::to_string(&FieldValue::UInt(7)).unwrap();
        assert_eq!(json, "7");
        let json = serde_json::to_string(&FieldValue::Str("3 seconds ago".into())).unwrap();
        assert_eq!(json, "\"3 seconds ago\"");
    }
}
