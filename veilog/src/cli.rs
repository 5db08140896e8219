// veilog/src/cli.rs
//! This file defines the command-line interface (CLI) for the veilog
//! application, including all available commands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "veilog",
    author = "Veilog Team",
    version = env!("CARGO_PKG_VERSION"),
    about = "Redact sensitive fields in log lines with recoverable ciphertext",
    long_about = "Veilog sits in a logging pipeline and replaces configured sensitive field values (phone numbers, emails, ...) with their ciphertext before the lines reach persistent storage. Values stay recoverable by whoever holds the cipher key.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Suppress all informational and debug messages.
    #[arg(long, short = 'q', help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG for this run).
    #[arg(long, short = 'd', help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `veilog` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redacts stdin (or a file) line by line and writes to stdout.
    #[command(about = "Redacts an input file or stdin line by line, replacing field values with ciphertext.")]
    Redact(RedactCommand),

    /// Recovers a redacted value using a configured field or an explicit cipher.
    #[command(about = "Recovers a redacted value; requires the cipher key used to produce it.")]
    Decrypt(DecryptCommand),

    /// Validates a settings file and prints the resulting field table.
    #[command(about = "Validates a settings file and prints the field table it would build.")]
    Check(CheckCommand),
}

/// Arguments for the `redact` command.
#[derive(Parser, Debug)]
pub struct RedactCommand {
    /// Path to a field settings file (falls back to the default location,
    /// then to the built-in configuration).
    #[arg(long, short = 'c', value_name = "FILE", env = "VEILOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read input from a specified file instead of stdin.
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Write redacted output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output_file: Option<PathBuf>,
}

/// Arguments for the `decrypt` command.
#[derive(Parser, Debug)]
pub struct DecryptCommand {
    /// Path to a field settings file (used with --field).
    #[arg(long, short = 'c', value_name = "FILE", env = "VEILOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Recover using the cipher configured for this field.
    #[arg(long, short = 'f', conflicts_with_all = ["cipher_type", "key"])]
    pub field: Option<String>,

    /// Cipher type to use directly (e.g. XXTEA, BASE64).
    #[arg(long = "type", value_name = "TYPE")]
    pub cipher_type: Option<String>,

    /// Cipher key to use directly.
    #[arg(long, short = 'k', value_name = "KEY")]
    pub key: Option<String>,

    /// The ciphertext to recover.
    pub ciphertext: String,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// The settings file to validate.
    #[arg(value_name = "FILE")]
    pub config: PathBuf,
}
