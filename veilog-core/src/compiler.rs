//! compiler.rs - Compiles field specs into match-ready tables.
//!
//! This module renders `%s` pattern templates against their field name,
//! compiles them, classifies each pattern's capture shape once at build
//! time, and binds the field's cipher strategy. A thread-safe global cache
//! keyed by a hash of the configuration avoids redundant compilation and
//! gives the one-time, race-free table build the concurrency model relies
//! on.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::cipher::registry::StrategyRegistry;
use crate::cipher::CipherStrategy;
use crate::config::{FieldConfig, FieldSpec, MAX_PATTERN_LENGTH};
use crate::errors::{Result, VeilogError};

/// How a pattern's capture groups map onto the replacement, decided once
/// when the pattern is compiled rather than inferred per match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureShape {
    /// Two groups: prefix (key token plus separator), raw value.
    Simple,
    /// Three groups: prefix, a quote/escape marker echoed on both sides of
    /// the ciphertext, raw value.
    Quoted,
}

/// One compiled pattern of a field.
#[derive(Debug)]
pub struct FieldPattern {
    pub regex: Regex,
    pub shape: CaptureShape,
}

/// A field ready for matching: compiled patterns in template order plus the
/// strategy instance that ciphers its values. Derived once from a
/// [`FieldSpec`], immutable thereafter.
pub struct CompiledField {
    pub name: String,
    pub patterns: Vec<FieldPattern>,
    pub strategy: Arc<dyn CipherStrategy>,
}

impl fmt::Debug for CompiledField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledField")
            .field("name", &self.name)
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

lazy_static! {
    /// A thread-safe, global cache for compiled field tables.
    /// The key is a hash of the `FieldConfig`.
    static ref COMPILED_FIELDS_CACHE: RwLock<HashMap<u64, Arc<Vec<CompiledField>>>> =
        RwLock::new(HashMap::new());
}

/// Hashes the `FieldConfig` to create a stable, unique key for the cache.
///
/// To ensure determinism, the fields are sorted by name before hashing.
fn hash_config(config: &FieldConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    let mut fields_to_hash = config.fields.clone();
    fields_to_hash.sort_by(|a, b| a.name.cmp(&b.name));
    fields_to_hash.hash(&mut hasher);
    hasher.finish()
}

/// Compiles a single field spec against `registry`.
///
/// An unknown cipher type is a configuration error and propagates; pattern
/// problems also propagate so the caller can decide whether to drop the
/// field or abort.
pub fn compile_field(spec: &FieldSpec, registry: &StrategyRegistry) -> Result<CompiledField> {
    let strategy = registry.create_strategy(&spec.cipher_type, &spec.cipher_key)?;
    let patterns = compile_field_patterns(spec)?;
    Ok(CompiledField {
        name: spec.name.clone(),
        patterns,
        strategy,
    })
}

/// Renders and compiles a spec's pattern templates without binding a
/// strategy; used for ad hoc field sets that reuse an existing strategy.
pub fn compile_field_patterns(spec: &FieldSpec) -> Result<Vec<FieldPattern>> {
    let mut compiled = Vec::with_capacity(spec.patterns.len());
    for template in &spec.patterns {
        if template.len() > MAX_PATTERN_LENGTH {
            return Err(VeilogError::PatternLengthExceeded(
                spec.name.clone(),
                template.len(),
                MAX_PATTERN_LENGTH,
            ));
        }

        let pattern = template.replacen("%s", &spec.name, 1);
        let regex = RegexBuilder::new(&pattern)
            .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
            .build()
            .map_err(|e| VeilogError::PatternCompilation(spec.name.clone(), e))?;

        // captures_len() counts the implicit whole-match group.
        let shape = match regex.captures_len() {
            3 => CaptureShape::Simple,
            4 => CaptureShape::Quoted,
            other => {
                return Err(VeilogError::CaptureArity(spec.name.clone(), other - 1));
            }
        };
        compiled.push(FieldPattern { regex, shape });
    }
    Ok(compiled)
}

/// Compiles the full field table.
///
/// An unknown cipher type fails the whole build (fail fast at startup). A
/// field whose pattern fails to compile is dropped with a warning; the
/// remaining fields still load.
pub fn compile_fields(
    config: &FieldConfig,
    registry: &StrategyRegistry,
) -> Result<Vec<CompiledField>> {
    debug!("Starting compilation of {} fields.", config.fields.len());
    let mut compiled = Vec::with_capacity(config.fields.len());

    for spec in &config.fields {
        if spec.name.is_empty() {
            warn!("Skipping field spec with an empty name.");
            continue;
        }
        match compile_field(spec, registry) {
            Ok(field) => {
                debug!(
                    "Field '{}' compiled: {} pattern(s), cipher {}.",
                    field.name,
                    field.patterns.len(),
                    spec.cipher_type
                );
                compiled.push(field);
            }
            Err(e @ VeilogError::UnknownCipherType(_)) => return Err(e),
            Err(e) => {
                warn!("Dropping field '{}': {}", spec.name, e);
            }
        }
    }

    debug!("Finished compiling fields. Total compiled: {}.", compiled.len());
    Ok(compiled)
}

/// Gets a compiled field table from the cache or compiles it if not found.
///
/// Returns an `Arc` so the table is shared cheaply across engines and
/// threads. The cache key covers the configuration only; callers holding a
/// customized registry should use [`compile_fields`] directly.
pub fn get_or_compile_fields(
    config: &FieldConfig,
    registry: &StrategyRegistry,
) -> Result<Arc<Vec<CompiledField>>> {
    let cache_key = hash_config(config);

    {
        let cache = COMPILED_FIELDS_CACHE.read().unwrap();
        if let Some(fields) = cache.get(&cache_key) {
            debug!("Serving compiled fields from cache for key: {}", &cache_key);
            return Ok(Arc::clone(fields));
        }
    } // Read lock is released here.

    let compiled = Arc::new(compile_fields(config, registry)?);
    COMPILED_FIELDS_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&compiled));

    debug!("Compiled and cached fields for key: {}", &cache_key);
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PATTERN;

    fn registry() -> StrategyRegistry {
        StrategyRegistry::builtin()
    }

    #[test]
    fn default_template_compiles_to_quoted_shape() {
        let spec = FieldSpec::new("mobile", "XXTEA", "key");
        let field = compile_field(&spec, &registry()).unwrap();
        assert_eq!(field.patterns.len(), 1);
        assert_eq!(field.patterns[0].shape, CaptureShape::Quoted);
    }

    #[test]
    fn two_group_template_compiles_to_simple_shape() {
        let spec = FieldSpec::with_patterns(
            "mobile",
            "BASE64",
            "",
            vec![r"(%s[:=])([^,}\s]+)".to_string()],
        );
        let field = compile_field(&spec, &registry()).unwrap();
        assert_eq!(field.patterns[0].shape, CaptureShape::Simple);
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let spec = FieldSpec::with_patterns("mobile", "BASE64", "", vec![r"%s:(\d+)".to_string()]);
        match compile_field(&spec, &registry()) {
            Err(VeilogError::CaptureArity(name, found)) => {
                assert_eq!(name, "mobile");
                assert_eq!(found, 1);
            }
            other => panic!("expected CaptureArity, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn broken_pattern_drops_only_its_field() {
        let mut config = FieldConfig::default_config();
        config.add_field(FieldSpec::with_patterns(
            "broken",
            "BASE64",
            "",
            vec![r"(%s[:=])([unclosed".to_string()],
        ));
        let compiled = compile_fields(&config, &registry()).unwrap();
        assert_eq!(compiled.len(), 1);
        assert_eq!(compiled[0].name, "mobile");
    }

    #[test]
    fn unknown_cipher_type_fails_the_build() {
        let mut config = FieldConfig::default_config();
        config.add_field(FieldSpec::new("email", "ROT13", ""));
        assert!(matches!(
            compile_fields(&config, &registry()),
            Err(VeilogError::UnknownCipherType(_))
        ));
    }

    #[test]
    fn oversized_template_is_rejected() {
        let huge = format!("(%s:)({})", "a".repeat(MAX_PATTERN_LENGTH));
        let spec = FieldSpec::with_patterns("mobile", "BASE64", "", vec![huge]);
        assert!(matches!(
            compile_field(&spec, &registry()),
            Err(VeilogError::PatternLengthExceeded(_, _, _))
        ));
    }

    #[test]
    fn cache_returns_the_same_table() {
        let config = FieldConfig::default_config();
        let a = get_or_compile_fields(&config, &registry()).unwrap();
        let b = get_or_compile_fields(&config, &registry()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn default_pattern_has_one_placeholder() {
        assert_eq!(DEFAULT_PATTERN.matches("%s").count(), 1);
    }
}
