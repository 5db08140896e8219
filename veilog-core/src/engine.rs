// veilog-core/src/engine.rs
//! The redaction engine: scans a formatted log message against the
//! compiled field table, ciphers captured values, and splices them back in
//! a single forward pass.
//!
//! The engine is an explicitly constructed object so independently
//! configured engines can coexist (tests, multi-tenant pipelines). The
//! compiled table and strategy instances are immutable after construction
//! and safe for unsynchronized concurrent reads.
//!
//! Redaction never fails: a fault in one field degrades to an inline
//! `[ENCRYPTION_ERROR ...]` marker, and a fault anywhere else yields the
//! best partial output. Log emission is never blocked by a redaction
//! fault.
//!
//! License: MIT OR APACHE 2.0

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use log::warn;
use regex::Regex;

use crate::cipher::registry::StrategyRegistry;
use crate::compiler::{compile_fields, get_or_compile_fields, CaptureShape, CompiledField, FieldPattern};
use crate::config::FieldConfig;
use crate::errors::{Result, VeilogError};
use crate::match_log;

pub struct RedactionEngine {
    fields: Arc<Vec<CompiledField>>,
    config: FieldConfig,
}

impl RedactionEngine {
    /// Builds an engine over the built-in strategy registry. Compiled
    /// tables are shared through the global cache, so constructing many
    /// engines from the same configuration is cheap.
    pub fn new(config: FieldConfig) -> Result<Self> {
        let fields = get_or_compile_fields(&config, &StrategyRegistry::builtin())?;
        Ok(Self { fields, config })
    }

    /// Builds an engine against a caller-supplied registry (custom cipher
    /// providers). Bypasses the global table cache.
    pub fn with_registry(config: FieldConfig, registry: &StrategyRegistry) -> Result<Self> {
        let fields = Arc::new(compile_fields(&config, registry)?);
        Ok(Self { fields, config })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn compiled_fields(&self) -> &[CompiledField] {
        &self.fields
    }

    /// Redacts every configured field occurrence in `message`.
    ///
    /// Always returns a string: per-field faults degrade to inline error
    /// markers and anything else degrades to the best partial output.
    pub fn redact(&self, message: &str) -> String {
        run_redaction(message, &self.fields)
    }

    /// Runs the identical scan over a caller-supplied ad hoc field set.
    /// The configured table is neither consulted nor modified.
    pub fn redact_with(&self, message: &str, fields: &[CompiledField]) -> String {
        run_redaction(message, fields)
    }

    /// Compiles an ad hoc field that reuses the cipher strategy configured
    /// for `name`, for one-off scans with caller-supplied templates.
    pub fn ad_hoc_field(&self, name: &str, templates: &[String]) -> Result<CompiledField> {
        let strategy = self
            .fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| Arc::clone(&f.strategy))
            .ok_or_else(|| VeilogError::UnconfiguredField(name.to_string()))?;

        let spec = crate::config::FieldSpec::with_patterns(
            name,
            // Type and key are irrelevant here; the strategy is reused.
            "",
            "",
            templates.to_vec(),
        );
        let patterns = crate::compiler::compile_field_patterns(&spec)?;
        Ok(CompiledField {
            name: name.to_string(),
            patterns,
            strategy,
        })
    }
}

/// Scans `message` field by field. Each field is processed in isolation: a
/// panic or error in one leaves the others untouched and keeps the last
/// good output.
fn run_redaction(message: &str, fields: &[CompiledField]) -> String {
    let mut current = message.to_string();
    for field in fields {
        // Cheap skip: the field name must occur verbatim somewhere before
        // any pattern can match.
        if !current.contains(&field.name) {
            continue;
        }
        let step = catch_unwind(AssertUnwindSafe(|| redact_one_field(&current, field)));
        current = match step {
            Ok(next) => next,
            Err(_) => {
                warn!(
                    "Redaction of field '{}' panicked; keeping last good output.",
                    field.name
                );
                current
            }
        };
    }
    current
}

/// Applies each of the field's patterns in order, feeding one pattern's
/// output into the next. A failed pattern application leaves the message
/// as it was and substitutes an error marker instead.
fn redact_one_field(message: &str, field: &CompiledField) -> String {
    let mut current = message.to_string();
    for pattern in &field.patterns {
        match apply_pattern(&current, pattern, field) {
            Ok(next) => current = next,
            Err(e) => {
                warn!("Redaction failed for field '{}': {}", field.name, e);
                current = mark_failure(&current, &field.name, &e.to_string());
            }
        }
    }
    current
}

/// One full left-to-right scan with a single forward output pass:
/// non-matching spans are copied verbatim, matches are rewritten according
/// to the pattern's capture shape.
fn apply_pattern(message: &str, pattern: &FieldPattern, field: &CompiledField) -> Result<String> {
    let mut out = String::with_capacity(message.len());
    let mut last_end = 0usize;

    for caps in pattern.regex.captures_iter(message) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&message[last_end..whole.start()]);

        match pattern.shape {
            CaptureShape::Quoted => {
                let Some(prefix) = caps.get(1) else {
                    // A pattern arm without a participating prefix group:
                    // leave the match untouched.
                    out.push_str(whole.as_str());
                    last_end = whole.end();
                    continue;
                };
                let marker = caps.get(2).map_or("", |m| m.as_str());
                let raw = caps.get(3).map_or("", |m| m.as_str());
                // Trailing backslash/quote runs belong to the surrounding
                // encoding, not the value.
                let value = raw.trim_end_matches(['\\', '"']);
                let ciphered = field.strategy.encrypt(value)?;
                match_log::log_redaction_debug(&field.name, value, &ciphered);
                out.push_str(prefix.as_str());
                out.push_str(marker);
                out.push_str(&ciphered);
                out.push_str(marker);
            }
            CaptureShape::Simple => {
                let prefix = caps.get(1).map_or("", |m| m.as_str());
                let value = caps.get(2).map_or("", |m| m.as_str());
                let ciphered = field.strategy.encrypt(value)?;
                match_log::log_redaction_debug(&field.name, value, &ciphered);
                out.push_str(prefix);
                out.push_str(&ciphered);
            }
        }
        last_end = whole.end();
    }

    out.push_str(&message[last_end..]);
    Ok(out)
}

/// Substitutes a visible error marker in place of the field's first
/// unguarded occurrence. When no occurrence matches (or the marker pattern
/// itself cannot be built), the message is returned unchanged so emission
/// still proceeds.
fn mark_failure(message: &str, field_name: &str, cause: &str) -> String {
    let marker = format!("[ENCRYPTION_ERROR for {field_name}: {cause}]");
    let pattern = format!(r"({field_name}:)[^,}}\s]+");
    match Regex::new(&pattern) {
        Ok(re) => re
            .replace(message, |caps: &regex::Captures<'_>| {
                format!("{}{}", &caps[1], marker)
            })
            .into_owned(),
        Err(e) => {
            warn!("Could not build error marker pattern for '{field_name}': {e}");
            message.to_string()
        }
    }
}
