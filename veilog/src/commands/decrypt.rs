// veilog/src/commands/decrypt.rs
//! Value recovery for key holders.

use anyhow::{bail, Context, Result};

use veilog_core::{FieldConfig, StrategyRegistry, DEFAULT_CIPHER_KEY};

use crate::cli::DecryptCommand;

pub fn run(cmd: &DecryptCommand) -> Result<()> {
    let registry = StrategyRegistry::builtin();

    let strategy = if let Some(field) = &cmd.field {
        let config = FieldConfig::load_or_default(cmd.config.as_deref());
        let spec = config
            .get(field)
            .with_context(|| format!("Field '{field}' is not configured"))?;
        registry
            .create_strategy(&spec.cipher_type, &spec.cipher_key)
            .with_context(|| format!("Field '{field}' has an unusable cipher configuration"))?
    } else if let Some(cipher_type) = &cmd.cipher_type {
        let key = cmd.key.as_deref().unwrap_or(DEFAULT_CIPHER_KEY);
        registry
            .create_strategy(cipher_type, key)
            .context("Failed to create cipher strategy")?
    } else {
        bail!("Either --field or --type is required");
    };

    let recovered = strategy
        .decrypt(&cmd.ciphertext)
        .context("Failed to decrypt; wrong key or corrupted ciphertext")?;
    println!("{recovered}");
    Ok(())
}
