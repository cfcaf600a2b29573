//! CSV encoding of a fetched record batch.
//!
//! The output contract is fixed: a comma-joined header line, then one row
//! per record in the given column order. Every field is stringified
//! (missing values become the empty string) and wrapped in double quotes
//! with internal quotes doubled. Rows are newline-joined; a field
//! containing a literal newline is preserved verbatim inside its quoted
//! cell. The result is handed to whatever download side effect the shell
//! provides and is not retained.

use medtriage_common::TriageRecord;

/// Default export file name, UTF-8 comma-separated text.
pub const EXPORT_FILE_NAME: &str = "admin-sessions.csv";

/// One export column: header plus field accessor.
pub struct ExportColumn {
    pub header: &'static str,
    extract: fn(&TriageRecord) -> String,
}

/// The fixed column order for the admin sessions export.
pub const EXPORT_COLUMNS: &[ExportColumn] = &[
    ExportColumn {
        header: "session_id",
        extract: |r| r.session_id.to_string(),
    },
    ExportColumn {
        header: "created_at",
        extract: |r| r.created_at.clone().unwrap_or_default(),
    },
    ExportColumn {
        header: "user_email",
        extract: |r| r.user_email().unwrap_or_default().to_string(),
    },
    ExportColumn {
        header: "risk_level",
        extract: |r| r.risk_level.to_string(),
    },
    ExportColumn {
        header: "confidence_score",
        extract: |r| r.confidence_score.map(|v| v.to_string()).unwrap_or_default(),
    },
    ExportColumn {
        header: "method",
        extract: |r| r.method.clone().unwrap_or_default(),
    },
    ExportColumn {
        header: "input_text",
        extract: |r| r.input_text.clone(),
    },
];

/// Encode a batch of records into delimited text.
pub fn encode(records: &[TriageRecord], columns: &[ExportColumn]) -> String {
    let header: Vec<&str> = columns.iter().map(|c| c.header).collect();
    let mut rows = vec![header.join(",")];

    for record in records {
        let fields: Vec<String> = columns
            .iter()
            .map(|c| escape(&(c.extract)(record)))
            .collect();
        rows.push(fields.join(","));
    }

    rows.join("\n")
}

/// Encode with the fixed admin export columns.
pub fn encode_default(records: &[TriageRecord]) -> String {
    encode(records, EXPORT_COLUMNS)
}

fn escape(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
