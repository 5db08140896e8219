// veilog-core/src/cipher/strategies.rs
//! The two shipped value transforms: a reversible base64 encoding and the
//! keyed XXTEA cipher.
//!
//! License: MIT OR APACHE 2.0

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

use super::xxtea;
use super::CipherStrategy;
use crate::errors::Result;

/// Reversible encoding of the value's UTF-8 bytes. Provides obfuscation,
/// not confidentiality: anyone can decode it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Strategy;

impl CipherStrategy for Base64Strategy {
    fn encrypt(&self, value: &str) -> Result<String> {
        Ok(BASE64.encode(value.as_bytes()))
    }

    fn decrypt(&self, value: &str) -> Result<String> {
        let raw = BASE64.decode(value.as_bytes())?;
        Ok(String::from_utf8(raw)?)
    }
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").unwrap());

/// Keyed cipher: XXTEA over the value's UTF-8 bytes, base64-armored so the
/// ciphertext is text-safe inside a log line.
#[derive(Debug, Clone)]
pub struct XxteaStrategy {
    key: String,
}

impl XxteaStrategy {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl CipherStrategy for XxteaStrategy {
    fn encrypt(&self, value: &str) -> Result<String> {
        Ok(BASE64.encode(xxtea::encrypt(value.as_bytes(), self.key.as_bytes())))
    }

    fn decrypt(&self, value: &str) -> Result<String> {
        // Producers that URL-decode or reflow ciphertext corrupt '+' into
        // whitespace; undo that before base64 decoding.
        let normalized = WHITESPACE.replace_all(value, "+");
        let raw = BASE64.decode(normalized.as_bytes())?;
        let plain = xxtea::decrypt(&raw, self.key.as_bytes())?;
        Ok(String::from_utf8(plain)?)
    }
}
