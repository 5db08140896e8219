// veilog/src/logger.rs
//! Logger initialization for the CLI.
//!
//! Diagnostics go to stderr so stdout stays clean for redacted output.

use log::LevelFilter;

pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp_secs();
    // Tests may initialize more than once; later calls are no-ops.
    let _ = builder.try_init();
}
