// veilog/src/commands/redact.rs
//! The line-buffered redaction pipe: read a line, redact it, emit it.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::info;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use veilog_core::{FieldConfig, RedactionEngine};

use crate::cli::RedactCommand;

pub fn run(cmd: &RedactCommand) -> Result<()> {
    let config = FieldConfig::load_or_default(cmd.config.as_deref());
    let engine = RedactionEngine::new(config).context("Failed to build redaction engine")?;
    info!(
        "Redacting with {} configured field(s).",
        engine.compiled_fields().len()
    );

    let reader: Box<dyn BufRead> = match &cmd.input_file {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open input file {}", path.display()))?,
        )),
        None => {
            if io::stdin().is_terminal() {
                info!("Reading from terminal; pipe log lines in or press Ctrl-D to finish.");
            }
            Box::new(io::stdin().lock())
        }
    };

    let mut writer: Box<dyn Write> = match &cmd.output_file {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file {}", path.display())
        })?)),
        None => Box::new(io::stdout().lock()),
    };

    for line in reader.lines() {
        let line = line.context("Failed to read input line")?;
        writeln!(writer, "{}", engine.redact(&line)).context("Failed to write output line")?;
        // Line-buffered: each redacted line is visible immediately, so the
        // pipe works for live log tails.
        writer.flush().context("Failed to flush output")?;
    }
    Ok(())
}
