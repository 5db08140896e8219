//! errors.rs - Custom error types for the veilog-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, VeilogError>;

/// This enum represents all possible error types in the `veilog-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum VeilogError {
    /// No strategy provider is registered under the requested type name.
    /// Surfaced when the field table is built; not recoverable at runtime.
    #[error("Unknown cipher type '{0}': no strategy provider registered")]
    UnknownCipherType(String),

    #[error("Failed to compile pattern for field '{0}': {1}")]
    PatternCompilation(String, regex::Error),

    #[error("Field '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    /// Compiled field patterns must expose exactly 2 or 3 capture groups.
    #[error("Field '{0}': pattern must expose 2 or 3 capture groups, found {1}")]
    CaptureArity(String, usize),

    #[error("Field '{0}' has no configured cipher strategy")]
    UnconfiguredField(String),

    #[error("Ciphertext is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The length word recovered from a decrypted buffer is inconsistent
    /// with the buffer itself: tampered or non-ciphertext input.
    #[error("Ciphertext is corrupt: claimed plaintext length {claimed} outside {min}..={max}")]
    CorruptCiphertext {
        claimed: usize,
        min: usize,
        max: usize,
    },

    #[error("Decrypted bytes are not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to serialize log event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("An unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
