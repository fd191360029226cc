//! Line-oriented text format for persisted Q-tables.
//!
//! Each entry is one line:
//!
//! ```text
//! ?<encoded-state>!(<action-x>,<action-y>)%<value>
//! ```
//!
//! There is no header or footer. The reader is tolerant: malformed lines are
//! skipped and counted, and a key that appears twice keeps the later value.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{Error, Result},
    identifiers::StateActionKey,
    perception::codec,
    q_learning::QTable,
    types::Position,
};

/// Summary of a table load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Records applied to the table, duplicates included
    pub loaded: usize,
    /// Records whose key was already present
    pub duplicates: usize,
    /// Lines that could not be parsed
    pub skipped: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.duplicates == 0 && self.skipped == 0
    }
}

/// A single parsed table line.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRecord {
    pub key: StateActionKey,
    pub value: f64,
}

/// Render one entry as a table line, without the trailing newline.
pub fn format_record(key: &StateActionKey, value: f64) -> String {
    format!(
        "?{}!({},{})%{}",
        key.state, key.action.x, key.action.y, value
    )
}

/// Parse one table line.
///
/// The state is the text between `?` and the first `!`. The action is the
/// pair between the last `(` after the `!` and the following `)`. The value
/// is everything after the final `%`. The state is decoded and re-encoded so
/// the resulting key is canonical.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] naming `line_number` if any part is
/// missing or does not parse.
pub fn parse_record(line: &str, line_number: usize) -> Result<TableRecord> {
    let malformed = |reason: String| Error::MalformedRecord {
        line: line_number,
        reason,
    };

    let body = line
        .trim()
        .strip_prefix('?')
        .ok_or_else(|| malformed("missing leading '?'".to_string()))?;
    let (state_text, rest) = body
        .split_once('!')
        .ok_or_else(|| malformed("missing '!' after state".to_string()))?;
    let (action_text, value_text) = rest
        .rsplit_once('%')
        .ok_or_else(|| malformed("missing '%' before value".to_string()))?;

    let open = action_text
        .rfind('(')
        .ok_or_else(|| malformed("missing '(' in action".to_string()))?;
    let close = action_text[open..]
        .find(')')
        .map(|offset| open + offset)
        .ok_or_else(|| malformed("missing ')' in action".to_string()))?;

    let action =
        Position::parse(&action_text[open..=close]).map_err(|e| malformed(e.to_string()))?;
    let value = value_text
        .trim()
        .parse::<f64>()
        .map_err(|e| malformed(format!("invalid value '{}': {e}", value_text.trim())))?;
    let state = codec::decode(state_text).map_err(|e| malformed(e.to_string()))?;

    Ok(TableRecord {
        key: StateActionKey::new(codec::encode(&state), action),
        value,
    })
}

/// Write every entry of `table`, ordered by key. Returns the entry count.
pub fn write_table<W: Write>(table: &QTable, mut writer: W) -> std::io::Result<usize> {
    let entries = table.snapshot();
    for (key, value) in &entries {
        writeln!(writer, "{}", format_record(key, *value))?;
    }
    writer.flush()?;
    Ok(entries.len())
}

/// Merge the lines read from `reader` into `table`.
///
/// # Errors
///
/// Only read failures are errors. Malformed lines, including lines that
/// are not valid UTF-8, are skipped with a warning.
pub fn read_table<R: BufRead>(table: &QTable, reader: R) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    for (index, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.map_err(|source| Error::Io {
            operation: format!("read table line {}", index + 1),
            source,
        })?;
        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(error) => {
                warn!(line = index + 1, %error, "skipping Q-table line that is not UTF-8");
                report.skipped += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_record(&line, index + 1) {
            Ok(TableRecord { key, value }) => {
                if let Some(previous) = table.insert_loaded(key.clone(), value) {
                    warn!(
                        line = index + 1,
                        key = %key,
                        previous,
                        value,
                        "duplicate Q-table key, keeping the later value"
                    );
                    report.duplicates += 1;
                }
                report.loaded += 1;
            }
            Err(error) => {
                warn!(%error, "skipping malformed Q-table line");
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}
