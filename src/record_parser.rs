/*!
 * Record list parsing.
 *
 * A record list is plain text with one record per line. A line holds either a single
 * token, used as both the file name and the QR payload, or a name and a payload
 * separated by a space.
 */

use crate::errors::RecordError;

/// One (name, payload) pair parsed from a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// File name without extension
    pub name: String,
    /// Text encoded into the QR symbol
    pub payload: String,
}

impl Record {
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

/// Split raw input into lines.
///
/// Empty lines are kept so that the index of a line is also its job index.
pub fn split_lines(raw: &str) -> Vec<&str> {
    raw.split('\n').collect()
}

/// Parse one line into a record.
///
/// Returns `Ok(None)` for a line that is blank after trimming.
pub fn parse_record(line: &str) -> Result<Option<Record>, RecordError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split(' ').collect();
    match tokens.as_slice() {
        [single] => Ok(Some(Record::new(*single, *single))),
        [name, payload] => Ok(Some(Record::new(*name, *payload))),
        _ => Err(RecordError::Malformed {
            line: trimmed.to_string(),
            tokens: tokens.len(),
        }),
    }
}

/// Count the lines that would produce a record
pub fn count_well_formed(raw: &str) -> usize {
    split_lines(raw)
        .into_iter()
        .filter(|line| matches!(parse_record(line), Ok(Some(_))))
        .count()
}
