// veilog-core/src/lib.rs
//! # Veilog Core Library
//!
//! `veilog-core` redacts sensitive fields inside already-formatted log
//! lines. Field occurrences are located with configurable patterns and the
//! captured value is replaced in place with its ciphertext, so raw PII
//! never reaches persistent log storage while remaining recoverable by key
//! holders.
//!
//! The library is pure and synchronous: every operation is an in-memory
//! string or byte transformation. It does not format log arguments and it
//! does not write to any sink; those belong to the logging pipeline around
//! it.
//!
//! ## Modules
//!
//! * `config`: the flat key/value settings surface, `FieldSpec`s and the
//!   fallback configuration.
//! * `compiler`: renders and compiles pattern templates into immutable,
//!   cached field tables.
//! * `engine`: the `RedactionEngine` that scans, ciphers and splices.
//! * `cipher`: the `CipherStrategy` trait, the base64 and XXTEA
//!   strategies, the XXTEA primitive, and the strategy registry.
//! * `match_log`: PII-safe debug logging of redaction events.
//! * `logger`: `RedactLog`, a redacting `log::Log` wrapper preserving
//!   call-site metadata.
//! * `json_event`: a structured-field writer emitting redacted JSON
//!   events.
//!
//! ## Usage Example
//!
//! ```rust
//! use veilog_core::{FieldConfig, RedactionEngine};
//!
//! fn main() -> anyhow::Result<()> {
//!     // Without a settings file the engine falls back to the single
//!     // built-in field ("mobile", keyed cipher).
//!     let config = FieldConfig::default_config();
//!     let engine = RedactionEngine::new(config)?;
//!
//!     let line = r#"{"mobile":"13979923451","status":"OK"}"#;
//!     let redacted = engine.redact(line);
//!     assert!(!redacted.contains("13979923451"));
//!     assert!(redacted.contains(r#""status":"OK""#));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Configuration and table building return `Result`s: an unknown cipher
//! type fails fast, a broken pattern drops only its field. The `redact`
//! call itself never fails; faults degrade to inline
//! `[ENCRYPTION_ERROR ...]` markers or to the best partial output, so log
//! emission is never blocked by a redaction fault.
//!
//! ## Concurrency
//!
//! Compiled field tables and strategy instances are immutable after their
//! one-time, race-guarded build and safe for unsynchronized concurrent
//! reads from any number of logging threads.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod cipher;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod errors;
pub mod json_event;
pub mod logger;
pub mod match_log;

/// Re-exports the configuration types and the settings surface.
pub use config::{
    FieldConfig, FieldSpec, Settings, DEFAULT_CIPHER_KEY, DEFAULT_CIPHER_TYPE, DEFAULT_FIELD,
    DEFAULT_PATTERN, MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::VeilogError;

/// Re-exports the redaction engine.
pub use engine::RedactionEngine;

/// Re-exports the compiled-table types for advanced and ad hoc usage.
pub use compiler::{compile_field, compile_fields, get_or_compile_fields, CaptureShape, CompiledField, FieldPattern};

/// Re-exports the cipher seam: the strategy trait, both shipped
/// strategies, and the provider registry.
pub use cipher::registry::{StrategyProvider, StrategyRegistry};
pub use cipher::strategies::{Base64Strategy, XxteaStrategy};
pub use cipher::CipherStrategy;

/// Re-exports the logging-pipeline adapters.
pub use json_event::{write_event, JsonEvent};
pub use logger::RedactLog;

/// Re-exports PII-safe logging helpers.
pub use match_log::{canonical_sample_hash, redact_sensitive};
