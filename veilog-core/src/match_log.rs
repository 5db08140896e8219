// veilog-core/src/match_log.rs
//! PII-safe debug logging for redaction events.
//!
//! The engine's own diagnostics must never become a second leak: captured
//! values are only logged verbatim when `VEILOG_ALLOW_DEBUG_PII=true`,
//! otherwise a placeholder is substituted. Deterministic sample hashes let
//! operators correlate events across log lines without exposing values.

use log::debug;
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

/// Initialized once to determine if PII is allowed in debug logs.
static PII_DEBUG_ALLOWED: Lazy<bool> = Lazy::new(|| {
    std::env::var("VEILOG_ALLOW_DEBUG_PII")
        .map(|s| s.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
});

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn loggable(sensitive: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive.to_string()
    } else {
        redact_sensitive(sensitive)
    }
}

/// Stable hash of a captured value, namespaced by field, for correlating
/// events without logging the value itself. Whitespace and case are
/// normalized so trivially reformatted values hash alike.
pub fn canonical_sample_hash(field_name: &str, value: &str) -> String {
    let normalized = value
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(field_name.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn log_redaction_debug(field_name: &str, value: &str, ciphertext: &str) {
    debug!(
        "Redacted field '{}': value={} (sample {}), ciphertext={}",
        field_name,
        loggable(value),
        &canonical_sample_hash(field_name, value)[..12],
        ciphertext
    );
}
