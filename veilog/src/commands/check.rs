// veilog/src/commands/check.rs
//! Settings validation: load strictly, compile, and show what the engine
//! would actually use.

use anyhow::{Context, Result};

use veilog_core::{FieldConfig, RedactionEngine, Settings, StrategyRegistry};

use crate::cli::CheckCommand;

pub fn run(cmd: &CheckCommand) -> Result<()> {
    let settings = Settings::load_from_file(&cmd.config)?;
    let config = FieldConfig::from_settings(&settings);

    let registry = StrategyRegistry::builtin();
    for field in &config.fields {
        if !registry.is_supported(&field.cipher_type) {
            anyhow::bail!(
                "Field '{}' selects unsupported cipher type '{}'",
                field.name,
                field.cipher_type
            );
        }
    }

    let engine = RedactionEngine::new(config.clone()).context("Failed to compile field table")?;

    println!("{} field(s) configured, {} compiled:", config.fields.len(), engine.compiled_fields().len());
    for field in engine.compiled_fields() {
        let spec = config.get(&field.name);
        println!(
            "  {:<16} cipher={:<8} patterns={}",
            field.name,
            spec.map_or("?", |s| s.cipher_type.as_str()),
            field.patterns.len()
        );
    }

    let dropped: Vec<&str> = config
        .fields
        .iter()
        .filter(|spec| engine.compiled_fields().iter().all(|f| f.name != spec.name))
        .map(|spec| spec.name.as_str())
        .collect();
    if !dropped.is_empty() {
        println!("dropped (pattern errors): {}", dropped.join(", "));
    }
    Ok(())
}
