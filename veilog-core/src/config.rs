//! Configuration management for `veilog-core`.
//!
//! This module defines the flat key/value settings surface, the per-field
//! specs derived from it, and the fallback configuration used when no
//! settings source is present. The surface is deliberately small:
//!
//! - `encrypt.fields` - comma-separated list of field names;
//! - `<field>.encrypt.type` - cipher type name (default `XXTEA`);
//! - `<field>.encrypt.key` - cipher key (default built-in);
//! - `<field>.patterns` - optional comma-separated pattern templates, each
//!   with one `%s` placeholder for the field name.
//!
//! License: MIT OR Apache-2.0

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Maximum allowed length for a pattern template string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Field configured when no settings source is available.
pub const DEFAULT_FIELD: &str = "mobile";

/// Cipher type used when a field does not select one.
pub const DEFAULT_CIPHER_TYPE: &str = "XXTEA";

/// Cipher key used when a field does not select one. Matches the key baked
/// into the legacy deployment so existing ciphertext stays recoverable.
pub const DEFAULT_CIPHER_KEY: &str = "a$fHDF&G;lNFj%ea";

/// Default pattern template. Tolerates a leading backslash/quote run before
/// the field name, `:` or `=` as separator, an optional backslash/quote run
/// before the value, and captures the value up to the first `,`, `}`, `)`,
/// newline, or end of input. Yields three capture groups: prefix, quote
/// marker, value.
pub const DEFAULT_PATTERN: &str = r#"(\\*"*%s\\*"*\s*[:=]\s*)(\\*"*)([^,})\n]*)"#;

/// A flat key/value settings source.
///
/// The on-disk form is a YAML document whose values are all scalars, e.g.:
///
/// ```yaml
/// encrypt.fields: mobile,email
/// mobile.encrypt.type: XXTEA
/// mobile.encrypt.key: a$fHDF&G;lNFj%ea
/// email.encrypt.type: BASE64
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    entries: HashMap<String, String>,
}

impl Settings {
    /// Parses a settings document. Every value must be a scalar; nested
    /// structures are rejected so typos fail loudly instead of silently
    /// configuring nothing.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: HashMap<String, serde_yml::Value> =
            serde_yml::from_str(text).context("Settings are not a flat key/value document")?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, value) in raw {
            let scalar = match value {
                serde_yml::Value::String(s) => s,
                serde_yml::Value::Number(n) => n.to_string(),
                serde_yml::Value::Bool(b) => b.to_string(),
                other => bail!("Settings value for '{key}' must be a scalar, got {other:?}"),
            };
            entries.insert(key, scalar);
        }
        Ok(Self { entries })
    }

    /// Loads settings from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = Self::parse(&text)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        info!(
            "Loaded {} settings entries from {}.",
            settings.entries.len(),
            path.display()
        );
        Ok(settings)
    }

    /// Builds settings from in-memory pairs, mainly for tests and callers
    /// that source configuration elsewhere.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The conventional settings location under the user config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("veilog").join("field-redact.yaml"))
    }
}

/// Declares one sensitive field: its matching pattern templates and the
/// cipher that transforms its captured values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as it appears in log lines. Non-empty, unique.
    pub name: String,
    /// Pattern templates, each with one `%s` placeholder for the name.
    pub patterns: Vec<String>,
    /// Cipher type name resolved through the strategy registry.
    pub cipher_type: String,
    /// Cipher key; ignored by keyless strategies.
    pub cipher_key: String,
}

impl FieldSpec {
    /// A spec using the default pattern template.
    pub fn new(
        name: impl Into<String>,
        cipher_type: impl Into<String>,
        cipher_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            patterns: vec![DEFAULT_PATTERN.to_string()],
            cipher_type: cipher_type.into(),
            cipher_key: cipher_key.into(),
        }
    }

    /// A spec with explicit pattern templates.
    pub fn with_patterns(
        name: impl Into<String>,
        cipher_type: impl Into<String>,
        cipher_key: impl Into<String>,
        patterns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            patterns,
            cipher_type: cipher_type.into(),
            cipher_key: cipher_key.into(),
        }
    }
}

/// The ordered set of field specs the engine is built from. Field order is
/// registration order and determines scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldConfig {
    pub fields: Vec<FieldSpec>,
}

impl FieldConfig {
    /// Derives the field set from a flat settings source, mirroring the
    /// settings surface documented on this module. Unknown keys are
    /// ignored; a missing `encrypt.fields` falls back to the default field
    /// name list.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut config = Self::default();
        let field_list = settings.get("encrypt.fields").unwrap_or(DEFAULT_FIELD);

        for name in field_list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if config.get(name).is_some() {
                warn!("Duplicate field '{name}' in encrypt.fields; keeping the first entry.");
                continue;
            }
            let cipher_type = settings
                .get(&format!("{name}.encrypt.type"))
                .unwrap_or(DEFAULT_CIPHER_TYPE);
            let cipher_key = settings
                .get(&format!("{name}.encrypt.key"))
                .unwrap_or(DEFAULT_CIPHER_KEY);

            let patterns: Vec<String> = settings
                .get(&format!("{name}.patterns"))
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            let spec = if patterns.is_empty() {
                FieldSpec::new(name, cipher_type, cipher_key)
            } else {
                FieldSpec::with_patterns(name, cipher_type, cipher_key, patterns)
            };
            config.add_field(spec);
        }
        config
    }

    /// Loads settings from `path` (or the conventional default location)
    /// and derives the field set. Never fails: an absent or unreadable
    /// settings source degrades to [`FieldConfig::default_config`] so
    /// startup proceeds with the hardcoded field.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let candidate = path.map(PathBuf::from).or_else(Settings::default_path);
        if let Some(path) = candidate {
            if path.exists() {
                match Settings::load_from_file(&path) {
                    Ok(settings) => return Self::from_settings(&settings),
                    Err(e) => warn!(
                        "Failed to load field settings from {}: {:#}. Using default configuration.",
                        path.display(),
                        e
                    ),
                }
            } else {
                warn!(
                    "No field settings found at {}; using default configuration.",
                    path.display()
                );
            }
        }
        Self::default_config()
    }

    /// The fallback configuration: exactly one keyed-cipher field.
    pub fn default_config() -> Self {
        let mut config = Self::default();
        config.add_field(FieldSpec::new(
            DEFAULT_FIELD,
            DEFAULT_CIPHER_TYPE,
            DEFAULT_CIPHER_KEY,
        ));
        config
    }

    /// Adds a field spec, replacing any existing spec of the same name in
    /// place so scan order is preserved.
    pub fn add_field(&mut self, spec: FieldSpec) {
        if spec.name.is_empty() {
            warn!("Ignoring field spec with an empty name.");
            return;
        }
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == spec.name) {
            *existing = spec;
        } else {
            self.fields.push(spec);
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
