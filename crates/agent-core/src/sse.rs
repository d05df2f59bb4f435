//! Server-sent event framing.
//!
//! Each record is a single `data:` line holding one JSON object, followed by
//! a blank line: `data: <json>\n\n`.

use crate::events::ChatEvent;

/// Content type of an Event Stream response.
pub const CONTENT_TYPE: &str = "text/event-stream";

/// Prefix of every record.
pub const DATA_PREFIX: &str = "data: ";

/// Record separator.
pub const RECORD_TERMINATOR: &str = "\n\n";

/// Encode one event as a self-delimited record.
pub fn encode_record(event: &ChatEvent) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(event)?;
    Ok(format!("{DATA_PREFIX}{json}{RECORD_TERMINATOR}"))
}

/// Parse a complete Event Stream body back into events.
///
/// Lines other than `data:` lines (comments, `event:`, `id:`) are ignored.
/// A trailing partial record without its terminator is ignored as well.
pub fn parse_records(body: &str) -> Result<Vec<ChatEvent>, serde_json::Error> {
    let mut events = Vec::new();
    let mut rest = body;
    while let Some(end) = rest.find(RECORD_TERMINATOR) {
        let block = &rest[..end];
        rest = &rest[end + RECORD_TERMINATOR.len()..];

        let data: Vec<&str> = block
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|d| d.strip_prefix(' ').unwrap_or(d))
            .collect();
        if data.is_empty() {
            continue;
        }
        events.push(serde_json::from_str(&data.join("\n"))?);
    }
    Ok(events)
}
