//! JSON-lines metric sink.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, warn};

use wgstat_core::collector::{Accumulator, Fields, ParseWarning, Tags};

/// One output line.
#[derive(Serialize)]
struct Line<'a> {
    time: String,
    name: &'a str,
    tags: &'a Tags,
    fields: &'a Fields,
}

/// Writes every metric as one JSON object per line, stamped with the cycle time.
pub struct JsonLinesSink<W: Write> {
    out: W,
    time: DateTime<Utc>,
    written: usize,
    warnings: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W, time: DateTime<Utc>) -> Self {
        Self {
            out,
            time,
            written: 0,
            warnings: 0,
        }
    }

    /// Metrics successfully written.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Warnings reported by the collector.
    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.out.flush() {
            error!("Failed to flush metrics: {}", e);
        }
    }
}

impl<W: Write> Accumulator for JsonLinesSink<W> {
    fn add_fields(&mut self, measurement: &str, fields: Fields, tags: Tags) {
        let line = Line {
            time: self.time.to_rfc3339_opts(SecondsFormat::Secs, true),
            name: measurement,
            tags: &tags,
            fields: &fields,
        };
        let result = serde_json::to_writer(&mut self.out, &line)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        match result {
            Ok(()) => self.written += 1,
            Err(e) => error!("Failed to write metric: {}", e),
        }
    }

    fn add_error(&mut self, warning: ParseWarning) {
        self.warnings += 1;
        warn!(line = warning.line(), "{}", warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn writes_one_json_object_per_metric() {
        let time = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let mut buf = Vec::new();
        {
            let mut sink = JsonLinesSink::new(&mut buf, time);
            let mut tags = Tags::new();
            tags.insert("interface".into(), "wg0".into());
            let mut fields = Fields::new();
            fields.insert("transferRx".into(), 10u64.into());
            sink.add_fields("wireguard", fields, tags);
            sink.add_error(ParseWarning::LineFormat {
                line: 2,
                field_count: 3,
            });
            assert_eq!(sink.written(), 1);
            assert_eq!(sink.warnings(), 1);
        }

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "{\"time\":\"2026-10-18T12:00:00Z\",\"name\":\"wireguard\",\"tags\":{\"interface\":\"wg0\"},\"fields\":{\"transferRx\":10}}\n"
        );
    }
}
