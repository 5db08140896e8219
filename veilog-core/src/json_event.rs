// veilog-core/src/json_event.rs
//! Structured-field writer: serializes a log event as one JSON object with
//! its message redacted before it ever reaches the serializer.

use chrono::Utc;
use serde::Serialize;
use std::io::Write;

use crate::engine::RedactionEngine;
use crate::errors::Result;

/// A single structured log event. The message field holds the redacted
/// form; the raw message is never stored.
#[derive(Debug, Clone, Serialize)]
pub struct JsonEvent {
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl JsonEvent {
    pub fn new(engine: &RedactionEngine, level: log::Level, target: &str, message: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            level: level.to_string(),
            target: target.to_string(),
            message: engine.redact(message),
        }
    }
}

/// Writes one redacted event as a JSON line.
pub fn write_event<W: Write>(
    writer: &mut W,
    engine: &RedactionEngine,
    level: log::Level,
    target: &str,
    message: &str,
) -> Result<()> {
    let event = JsonEvent::new(engine, level, target, message);
    serde_json::to_writer(&mut *writer, &event)?;
    writer.write_all(b"\n")?;
    Ok(())
}
