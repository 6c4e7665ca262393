//! Per-line problems found while parsing.

use serde::Serialize;

/// A line that was dropped. Never fatal for the gather cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// The line has no recognized shape (e.g. wrong column count).
    LineFormat { line: usize, field_count: usize },
    /// A numeric column of a peer line is not a base-10 `u64`.
    FieldCoercion {
        line: usize,
        field: &'static str,
        value: String,
    },
    /// A peer line not directly under the interface it names.
    OrphanPeer { line: usize, public_key: String },
}

impl ParseWarning {
    /// 1-based line number in the captured output.
    pub fn line(&self) -> usize {
        match self {
            ParseWarning::LineFormat { line, .. }
            | ParseWarning::FieldCoercion { line, .. }
            | ParseWarning::OrphanPeer { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::LineFormat { line, field_count } => write!(
                f,
                "line {}: unrecognized line with {} fields, skipped",
                line, field_count
            ),
            ParseWarning::FieldCoercion { line, field, value } => write!(
                f,
                "line {}: invalid {} value {:?}, peer skipped",
                line, field, value
            ),
            ParseWarning::OrphanPeer { line, public_key } => write!(
                f,
                "line {}: peer {} does not follow its interface, skipped",
                line, public_key
            ),
        }
    }
}

impl std::error::Error for ParseWarning {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_display() {
        let warning = ParseWarning::FieldCoercion {
            line: 7,
            field: "transferTx",
            value: "NaN".to_string(),
        };
        assert_eq!(warning.line(), 7);
        assert_eq!(
            warning.to_string(),
            "line 7: invalid transferTx value \"NaN\", peer skipped"
        );

        let orphan = ParseWarning::OrphanPeer {
            line: 2,
            public_key: "peerA".to_string(),
        };
        assert_eq!(orphan.line(), 2);
    }

    #[test]
    fn test_serialized_kind() {
        let json = serde_json::to_value(ParseWarning::LineFormat {
            line: 3,
            field_count: 2,
        })
        .unwrap();
        assert_eq!(json["kind"], "line_format");
        assert_eq!(json["line"], 3);
    }
}
